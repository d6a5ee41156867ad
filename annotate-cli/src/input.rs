//! Semantic map loading

use std::path::Path;

use annotate_map::SemanticMap;

use crate::error::{CliError, CliResult};

/// Read and parse a semantic map file. I/O problems are input errors;
/// malformed content surfaces the map layer's own diagnostics.
pub fn load_map(path: &Path) -> CliResult<SemanticMap> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("cannot read {}: {e}", path.display())))?;
    Ok(SemanticMap::from_json(&text)?)
}
