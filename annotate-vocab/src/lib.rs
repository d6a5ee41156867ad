//! RDF vocabulary constants and prefix handling for the annotation engine.
//!
//! This crate provides a centralized location for the namespace IRIs and
//! prefix handling used throughout the annotation workspace:
//!
//! - `ns` - namespace IRIs for the vocabularies the engine emits
//! - [`PrefixMap`] - the immutable prefix table passed into the resolver and
//!   the operation builders
//! - [`Curie`] - a validated compact IRI (`prefix:local`)
//! - [`sanitize_label`] - IRI-safe local identifier derivation

mod curie;
mod error;
mod label;
mod prefixes;

pub use curie::Curie;
pub use error::{VocabError, VocabResult};
pub use label::sanitize_label;
pub use prefixes::PrefixMap;

/// Named graph that receives every annotation insert.
///
/// The data graph produced by triplification is never written; all derived
/// triples are scoped to this graph so they can be inspected or reset
/// independently of the source data.
pub const ANNOTATION_GRAPH: &str = "http://annotation.local/";

/// Namespace IRIs for the vocabularies referenced by emitted operations.
pub mod ns {
    /// `db:` - per-database ontology namespace produced by the triplifier
    pub const DB: &str = "http://data.local/rdf/ontology/";

    /// `dbo:` - the database ontology (table/column/value structure)
    pub const DBO: &str = "http://um-cds/ontologies/databaseontology/";

    /// `rdf:` namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// `rdfs:` namespace
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// `owl:` namespace
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

    /// `roo:` - Radiation Oncology Ontology
    pub const ROO: &str = "http://www.cancerdata.org/roo/";

    /// `ncit:` - NCI Thesaurus
    pub const NCIT: &str = "http://ncicb.nci.nih.gov/xml/owl/EVS/Thesaurus.owl#";
}

/// Fixed predicates of the data-graph contract.
///
/// The ingestion stage guarantees these shapes; the engine only ever matches
/// on them in WHERE patterns and never asserts them into the data graph.
pub mod dbo {
    /// Links a record row to one of its column instances.
    pub const HAS_COLUMN: &str = "dbo:has_column";

    /// Links a column instance to its raw literal value.
    pub const HAS_VALUE: &str = "dbo:has_value";
}
