//! Per-variable lifecycle and the run report
//!
//! Each variable moves through a linear lifecycle:
//! pending, then resolved or skipped, then planned, executed, verified.
//! The report records where each variable ended up. Nothing is retried
//! automatically; re-running the engine is the only retry path, and it is
//! safe because every insert is idempotent.

use serde::Serialize;

use annotate_plan::VariablePlan;

/// Terminal state of one variable's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableState {
    /// No local definition; excluded from execution, not an error
    Skipped,
    /// Resolution failed; configuration error scoped to this variable
    ConfigError,
    /// Planned but not executed (dry run)
    Planned,
    /// A store write failed; later steps were not attempted
    ExecutionFailed,
    /// All operations applied; verification not requested
    Executed,
    /// All operations applied and every check passed
    Verified,
    /// A check found an expected assertion absent after a successful write
    VerificationFailed,
    /// A check itself could not be evaluated
    VerificationError,
}

impl VariableState {
    /// Whether this outcome should count as a failure in exit status terms.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            VariableState::ConfigError
                | VariableState::ExecutionFailed
                | VariableState::VerificationFailed
                | VariableState::VerificationError
        )
    }
}

/// Outcome record for one variable.
#[derive(Debug, Clone, Serialize)]
pub struct VariableOutcome {
    pub variable: String,
    pub state: VariableState,
    /// Update operations applied before the run stopped
    pub applied: usize,
    /// 1-based index of the failing operation, when execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The rendered plan, carried when the caller asked for queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<VariablePlan>,
}

impl VariableOutcome {
    pub(crate) fn terminal(variable: impl Into<String>, state: VariableState) -> Self {
        VariableOutcome {
            variable: variable.into(),
            state,
            applied: 0,
            failed_step: None,
            error: None,
            plan: None,
        }
    }
}

/// Full run report, one entry per variable in deterministic name order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub database: String,
    pub variables: Vec<VariableOutcome>,
}

impl RunReport {
    /// Variables whose outcome counts as a failure.
    pub fn failures(&self) -> impl Iterator<Item = &VariableOutcome> {
        self.variables.iter().filter(|v| v.state.is_failure())
    }
}
