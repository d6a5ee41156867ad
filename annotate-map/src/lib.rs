//! Semantic-map model and resolution
//!
//! This crate owns the declarative input of the annotation engine: the
//! per-variable semantic mapping document. It provides three layers:
//!
//! - [`model`] - the serde data model of a semantic map (one
//!   [`VariableMapping`] per source column, with optional schema
//!   reconstruction steps and value-mapping terms)
//! - loading: [`SemanticMap::from_json`] parses the top-level document;
//!   individual variable entries are deserialized lazily so one malformed
//!   variable never aborts the whole run
//! - [`resolve`] - the term resolver: validates compact identifiers against
//!   the prefix table, skips undescribed variables, and rejects shared
//!   reconstruction labels with conflicting definitions

pub mod error;
pub mod model;
pub mod resolve;

pub use error::{MapError, MapResult};
pub use model::{
    DataType, Placement, ReconstructionStep, SemanticMap, StepKind, TermMapping, ValueMapping,
    VariableMapping,
};
pub use resolve::{
    resolve_all, resolve_variable, ClassStep, NodeStep, ResolveOutcome, ResolvedStep,
    ResolvedTerm, ResolvedVariable,
};
