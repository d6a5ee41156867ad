use std::path::Path;

use annotate_exec::{verify_annotation, HttpStore};
use colored::Colorize;

use crate::commands::print_outcome;
use crate::error::{CliError, CliResult};
use crate::input::load_map;

pub async fn run(map_path: &Path, endpoint: Option<&str>) -> CliResult<()> {
    let map = load_map(map_path)?;
    let endpoint = endpoint.unwrap_or(&map.endpoint);
    let store = HttpStore::new(endpoint)?;

    let report = verify_annotation(&map, &store).await;

    println!("verify: {}", report.database.bold());
    for outcome in &report.variables {
        print_outcome(outcome);
    }

    let failures = report.failures().count();
    if failures > 0 {
        return Err(CliError::Failures(failures));
    }
    Ok(())
}
