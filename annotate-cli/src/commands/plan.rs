use std::path::Path;

use annotate_exec::plan_all;
use annotate_map::ResolveOutcome;
use annotate_plan::VariablePlan;
use colored::Colorize;

use crate::error::{CliError, CliResult};
use crate::input::load_map;

pub fn run(map_path: &Path, save_queries: Option<&Path>) -> CliResult<()> {
    let map = load_map(map_path)?;
    let planned = plan_all(&map);

    let mut failures = 0usize;
    for (outcome, plan) in &planned {
        match outcome {
            ResolveOutcome::Resolved(_) => {
                let Some(plan) = plan else { continue };
                println!(
                    "  {} {} ({} operation{})",
                    "planned".cyan(),
                    plan.variable,
                    plan.operations.len(),
                    if plan.operations.len() == 1 { "" } else { "s" }
                );
                if let Some(dir) = save_queries {
                    save_plan(dir, plan)?;
                }
            }
            ResolveOutcome::Undescribed { name } => {
                println!("  {} {name}", "skipped".dimmed());
            }
            ResolveOutcome::Invalid { name, reason } => {
                println!("  {} {name} ({reason})", "failed".red().bold());
                failures += 1;
            }
        }
    }

    if let Some(dir) = save_queries {
        println!("queries written to {}", dir.display());
    }
    if failures > 0 {
        return Err(CliError::Failures(failures));
    }
    Ok(())
}

/// Write a variable's queries as numbered `.rq` files under
/// `{dir}/{variable}/`.
fn save_plan(dir: &Path, plan: &VariablePlan) -> CliResult<()> {
    let target = dir.join(&plan.variable);
    std::fs::create_dir_all(&target)
        .map_err(|e| CliError::Input(format!("cannot create {}: {e}", target.display())))?;
    for (index, op) in plan.operations.iter().enumerate() {
        let file = target.join(format!("{:02}_{}.rq", index + 1, op.label));
        std::fs::write(&file, &op.sparql)
            .map_err(|e| CliError::Input(format!("cannot write {}: {e}", file.display())))?;
    }
    for (index, check) in plan.verification.iter().enumerate() {
        let file = target.join(format!("ask_{:02}_{}.rq", index + 1, check.label));
        std::fs::write(&file, &check.sparql)
            .map_err(|e| CliError::Input(format!("cannot write {}: {e}", file.display())))?;
    }
    Ok(())
}
