//! Typed graph-update operations
//!
//! The planner's output is a list of these, fully rendered. Operations are
//! plain data so they can be diffed in tests, saved to disk, and embedded in
//! run reports without re-rendering.

use serde::Serialize;

/// What an update operation constructs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Declare an intermediate class and mint one row individual per record
    ConstructClass,
    /// Assert the variable's equivalence and its ownership chain
    AnnotateVariable,
    /// Declare a leaf node individual (for example a unit)
    ConstructNode,
    /// Declare an intersection class for one categorical term
    MapTerm,
}

/// One rendered `INSERT` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOp {
    pub kind: OpKind,
    /// Short, filename-safe tag identifying the operation within its variable
    pub label: String,
    pub sparql: String,
}

/// One rendered read-only `ASK` used by the quality-control pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskOp {
    pub label: String,
    pub sparql: String,
}

/// The full plan for one variable: updates in execution order, then the
/// checks that validate them after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariablePlan {
    pub variable: String,
    pub operations: Vec<UpdateOp>,
    pub verification: Vec<AskOp>,
}
