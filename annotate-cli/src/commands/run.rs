use std::path::Path;

use annotate_exec::{run_annotation, HttpStore, RunOptions};
use colored::Colorize;

use crate::commands::print_outcome;
use crate::error::{CliError, CliResult};
use crate::input::load_map;

pub async fn run(
    map_path: &Path,
    endpoint: Option<&str>,
    dry_run: bool,
    verify: bool,
    report_path: Option<&Path>,
) -> CliResult<()> {
    let map = load_map(map_path)?;
    let endpoint = endpoint.unwrap_or(&map.endpoint);
    let store = HttpStore::new(endpoint)?;

    let options = RunOptions {
        dry_run,
        verify,
        include_queries: report_path.is_some(),
    };
    let report = run_annotation(&map, &store, options).await;

    println!(
        "{} {} ({} variable{})",
        if dry_run { "dry run:" } else { "run:" },
        report.database.bold(),
        report.variables.len(),
        if report.variables.len() == 1 { "" } else { "s" }
    );
    for outcome in &report.variables {
        print_outcome(outcome);
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::Input(format!("cannot serialise report: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| CliError::Input(format!("cannot write {}: {e}", path.display())))?;
        println!("report written to {}", path.display());
    }

    let failures = report.failures().count();
    if failures > 0 {
        return Err(CliError::Failures(failures));
    }
    Ok(())
}
