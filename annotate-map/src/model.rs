//! Semantic-map data model
//!
//! Mirrors the legacy JSON layout consumed by the annotation engine:
//!
//! ```json
//! {
//!   "endpoint": "http://localhost:7200/repositories/userRepo/statements",
//!   "database_name": "my_database",
//!   "variable_info": {
//!     "biological_sex": {
//!       "predicate": "roo:P100018",
//!       "class": "ncit:C28421",
//!       "local_definition": "sex",
//!       "schema_reconstruction": [ ... ],
//!       "value_mapping": { "terms": { ... } }
//!     }
//!   }
//! }
//! ```
//!
//! Variable entries are kept as raw JSON values in [`SemanticMap`] and only
//! deserialized per variable, so a malformed entry is a per-variable error
//! rather than a fatal one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// Top-level semantic map document.
#[derive(Debug, Clone, Deserialize)]
pub struct SemanticMap {
    /// SPARQL statements endpoint the run writes to
    pub endpoint: String,

    /// Database namespace all derived identifiers live under
    pub database_name: String,

    /// Extra prefix declarations merged over the engine defaults
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,

    /// One entry per source column; deserialized lazily per variable
    pub variable_info: BTreeMap<String, serde_json::Value>,
}

impl SemanticMap {
    /// Parse a semantic map document, validating the top-level contract.
    ///
    /// A missing or empty `endpoint`/`database_name`, or an absent
    /// `variable_info` object, is fatal to the whole run.
    pub fn from_json(input: &str) -> MapResult<Self> {
        let map: SemanticMap = serde_json::from_str(input)?;
        if map.endpoint.trim().is_empty() {
            return Err(MapError::Input("`endpoint` is empty".to_string()));
        }
        if map.database_name.trim().is_empty() {
            return Err(MapError::Input("`database_name` is empty".to_string()));
        }
        Ok(map)
    }

    /// Deserialize one variable entry. Failure is scoped to that variable.
    pub fn variable(&self, name: &str) -> Option<Result<VariableMapping, serde_json::Error>> {
        self.variable_info
            .get(name)
            .map(|value| serde_json::from_value(value.clone()))
    }

    /// Iterate variable names in deterministic (sorted) order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variable_info.keys().map(|s| s.as_str())
    }
}

/// Declarative mapping of one source column.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VariableMapping {
    /// Relation through which instances attach to the record individual
    pub predicate: Option<String>,

    /// Class the variable's instances are equivalent to
    pub class: Option<String>,

    /// Raw column name in the source table; absent means "undescribed"
    /// and the variable is skipped rather than failed
    pub local_definition: Option<String>,

    /// Informational only; does not alter planning
    pub data_type: Option<DataType>,

    /// Ordered reconstruction steps applied around the variable's class
    #[serde(default)]
    pub schema_reconstruction: Vec<ReconstructionStep>,

    /// Per-category term mapping for categorical variables
    pub value_mapping: Option<ValueMapping>,
}

/// Declared data type of a variable. Informational; carried through to the
/// run report but never consulted by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Categorical,
    Continuous,
    Identifier,
    Ordinal,
    Date,
    Text,
}

/// One schema-reconstruction step.
///
/// `class` steps introduce an intermediate class into the ownership chain;
/// `node` steps attach a terminal leaf (e.g. a unit) off the variable's
/// class. All fields are optional at the model layer; the resolver enforces
/// which are required for each kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconstructionStep {
    #[serde(rename = "type")]
    pub kind: StepKind,

    /// Class steps only; defaults to `before`
    pub placement: Option<Placement>,

    /// Relation introduced by this step
    pub predicate: Option<String>,

    /// Target class introduced by this step
    pub class: Option<String>,

    /// Stable identifier for an introduced class, unique within the
    /// database namespace; shared labels dedupe to the same derived IRI
    pub class_label: Option<String>,

    /// Stable identifier for an introduced node
    pub node_label: Option<String>,

    /// Human-readable `rdfs:label` for the introduced class or node
    pub aesthetic_label: Option<String>,
}

/// Step discriminator (`"type"` in the JSON)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Class,
    Node,
}

/// Placement of an inserted class relative to the variable's own class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Between the record individual and the variable's class (default)
    #[default]
    Before,
    /// Between the variable's class and the step's own target class
    After,
}

/// Value mapping for a categorical variable
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValueMapping {
    /// Standard term key → term mapping, in deterministic order
    #[serde(default)]
    pub terms: BTreeMap<String, TermMapping>,
}

/// One categorical term.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TermMapping {
    /// Raw value found in the source column for this category. `null` or
    /// empty means the category was not observed in this dataset: the term
    /// is skipped, never an error.
    pub local_term: Option<String>,

    /// Standard class this category maps to
    pub target_class: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "endpoint": "http://localhost:7200/repositories/repo/statements",
        "database_name": "cohort",
        "variable_info": {
            "biological_sex": {
                "predicate": "roo:P100018",
                "class": "ncit:C28421",
                "local_definition": "sex"
            }
        }
    }"#;

    #[test]
    fn parses_minimal_map() {
        let map = SemanticMap::from_json(MINIMAL).unwrap();
        assert_eq!(map.database_name, "cohort");
        let var = map.variable("biological_sex").unwrap().unwrap();
        assert_eq!(var.predicate.as_deref(), Some("roo:P100018"));
        assert!(var.schema_reconstruction.is_empty());
    }

    #[test]
    fn missing_endpoint_is_fatal() {
        let err = SemanticMap::from_json(r#"{"database_name": "d", "variable_info": {}}"#)
            .unwrap_err();
        assert!(matches!(err, MapError::Parse(_)));
    }

    #[test]
    fn empty_database_name_is_fatal() {
        let err = SemanticMap::from_json(
            r#"{"endpoint": "http://e", "database_name": " ", "variable_info": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MapError::Input(_)));
    }

    #[test]
    fn malformed_variable_is_scoped() {
        let map = SemanticMap::from_json(
            r#"{
                "endpoint": "http://e",
                "database_name": "d",
                "variable_info": {
                    "bad": {"schema_reconstruction": 7},
                    "good": {"predicate": "roo:P1", "class": "ncit:C1", "local_definition": "g"}
                }
            }"#,
        )
        .unwrap();
        assert!(map.variable("bad").unwrap().is_err());
        assert!(map.variable("good").unwrap().is_ok());
    }

    #[test]
    fn placement_defaults_to_before() {
        let step: ReconstructionStep = serde_json::from_str(
            r#"{"type": "class", "predicate": "roo:p", "class": "ncit:C1",
                "class_label": "demographicClass", "aesthetic_label": "Demographic"}"#,
        )
        .unwrap();
        assert_eq!(step.kind, StepKind::Class);
        assert_eq!(step.placement.unwrap_or_default(), Placement::Before);
    }
}
