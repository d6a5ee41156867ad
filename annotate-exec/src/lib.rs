//! Annotation executor
//!
//! Applies planned operation sequences to a SPARQL store, one independent
//! run per variable, and produces the run report consumed by the CLI and
//! the verification surface.

pub mod error;
pub mod executor;
pub mod state;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use executor::{plan_all, run_annotation, verify_annotation, RunOptions};
pub use state::{RunReport, VariableOutcome, VariableState};
pub use store::{HttpStore, SparqlStore};
