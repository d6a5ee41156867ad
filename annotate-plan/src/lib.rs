//! Schema reconstruction planner and value-mapping compiler
//!
//! Takes resolved variables from `annotate-map` and renders the ordered
//! operation list that layers the annotation graph over the data graph:
//! intermediate class constructions, the variable attachment with its
//! ownership chain, node declarations, and one intersection class per
//! categorical term. All derived identifiers are computed, never looked up,
//! so planning needs no store access and re-running is safe.

pub mod build;
pub mod ids;
pub mod op;
pub mod planner;

pub use op::{AskOp, OpKind, UpdateOp, VariablePlan};
pub use planner::plan_variable;
