pub mod plan;
pub mod run;
pub mod verify;

use annotate_exec::{VariableOutcome, VariableState};
use colored::Colorize;

/// One status line per variable, shared by the run and verify commands.
pub(crate) fn print_outcome(outcome: &VariableOutcome) {
    let tag = match outcome.state {
        VariableState::Skipped => "skipped".dimmed(),
        VariableState::Planned => "planned".cyan(),
        VariableState::Executed | VariableState::Verified => "ok".green().bold(),
        VariableState::ConfigError
        | VariableState::ExecutionFailed
        | VariableState::VerificationFailed
        | VariableState::VerificationError => "failed".red().bold(),
    };
    match (&outcome.error, outcome.failed_step) {
        (Some(error), Some(step)) => {
            println!("  {tag} {} (step {step}: {error})", outcome.variable)
        }
        (Some(error), None) => println!("  {tag} {} ({error})", outcome.variable),
        _ => println!("  {tag} {}", outcome.variable),
    }
}
