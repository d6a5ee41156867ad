//! Term resolver
//!
//! Pure validation of variable mappings against the prefix table. Produces a
//! [`ResolveOutcome`] per variable: resolved (ready for planning), skipped
//! (undescribed - no `local_definition`), or invalid (configuration error,
//! fatal to that variable only).

use std::collections::BTreeMap;

use annotate_vocab::{Curie, PrefixMap};
use tracing::{debug, warn};

use crate::model::{Placement, ReconstructionStep, SemanticMap, StepKind, VariableMapping};
use crate::DataType;

/// A variable that passed resolution and is ready to plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    pub name: String,
    pub predicate: Curie,
    pub class: Curie,
    pub local_definition: String,
    pub data_type: Option<DataType>,
    /// Reconstruction steps in original array order
    pub steps: Vec<ResolvedStep>,
    /// Value-mapping terms with a concrete raw value, in term-key order
    pub terms: Vec<ResolvedTerm>,
}

/// A validated reconstruction step
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStep {
    Class(ClassStep),
    Node(NodeStep),
}

/// A validated `class` step
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStep {
    pub placement: Placement,
    pub predicate: Curie,
    pub class: Curie,
    pub label: String,
    pub aesthetic_label: String,
}

/// A validated `node` step
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStep {
    pub predicate: Curie,
    pub class: Curie,
    pub label: String,
    pub aesthetic_label: String,
}

/// A categorical term with an observed raw value.
///
/// Terms whose `local_term` is null or empty never reach this type: they
/// mean "category unobserved in this dataset" and are dropped here so the
/// value-mapping compiler emits nothing for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTerm {
    pub key: String,
    pub local_term: String,
    pub target_class: Curie,
}

/// Outcome of resolving one variable
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(ResolvedVariable),
    /// No `local_definition`: recorded, excluded from execution
    Undescribed { name: String },
    /// Configuration error scoped to this variable
    Invalid { name: String, reason: String },
}

impl ResolveOutcome {
    /// The variable name, whatever the outcome
    pub fn name(&self) -> &str {
        match self {
            ResolveOutcome::Resolved(v) => &v.name,
            ResolveOutcome::Undescribed { name } | ResolveOutcome::Invalid { name, .. } => name,
        }
    }
}

/// Labels may appear verbatim inside derived IRIs, so they must be IRI-safe.
fn check_label(label: &str) -> Result<(), String> {
    if label.is_empty() {
        return Err("empty label".to_string());
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("label `{label}` is not IRI-safe"));
    }
    Ok(())
}

fn resolve_curie(prefixes: &PrefixMap, field: &str, value: Option<&str>) -> Result<Curie, String> {
    let value = value.ok_or_else(|| format!("missing `{field}`"))?;
    prefixes
        .resolve(value)
        .map_err(|e| format!("invalid `{field}`: {e}"))
}

fn resolve_step(
    prefixes: &PrefixMap,
    index: usize,
    step: &ReconstructionStep,
) -> Result<ResolvedStep, String> {
    let fail = |msg: String| format!("reconstruction step {index}: {msg}");
    let predicate =
        resolve_curie(prefixes, "predicate", step.predicate.as_deref()).map_err(&fail)?;
    let class = resolve_curie(prefixes, "class", step.class.as_deref()).map_err(&fail)?;
    let aesthetic_label = step
        .aesthetic_label
        .clone()
        .ok_or_else(|| fail("missing `aesthetic_label`".to_string()))?;

    match step.kind {
        StepKind::Class => {
            let label = step
                .class_label
                .clone()
                .ok_or_else(|| fail("missing `class_label`".to_string()))?;
            check_label(&label).map_err(&fail)?;
            Ok(ResolvedStep::Class(ClassStep {
                placement: step.placement.unwrap_or_default(),
                predicate,
                class,
                label,
                aesthetic_label,
            }))
        }
        StepKind::Node => {
            let label = step
                .node_label
                .clone()
                .ok_or_else(|| fail("missing `node_label`".to_string()))?;
            check_label(&label).map_err(&fail)?;
            Ok(ResolvedStep::Node(NodeStep {
                predicate,
                class,
                label,
                aesthetic_label,
            }))
        }
    }
}

/// Resolve one variable mapping. Pure; no side effects beyond logging.
pub fn resolve_variable(
    name: &str,
    mapping: &VariableMapping,
    prefixes: &PrefixMap,
) -> ResolveOutcome {
    // Undescribed wins over any other problem: a variable nobody described
    // locally is skipped, not diagnosed.
    let Some(local_definition) = mapping
        .local_definition
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    else {
        debug!(variable = name, "no local definition, skipping");
        return ResolveOutcome::Undescribed {
            name: name.to_string(),
        };
    };

    let invalid = |reason: String| {
        warn!(variable = name, %reason, "variable configuration error");
        ResolveOutcome::Invalid {
            name: name.to_string(),
            reason,
        }
    };

    let predicate = match resolve_curie(prefixes, "predicate", mapping.predicate.as_deref()) {
        Ok(c) => c,
        Err(e) => return invalid(e),
    };
    let class = match resolve_curie(prefixes, "class", mapping.class.as_deref()) {
        Ok(c) => c,
        Err(e) => return invalid(e),
    };

    let mut steps = Vec::with_capacity(mapping.schema_reconstruction.len());
    for (index, step) in mapping.schema_reconstruction.iter().enumerate() {
        match resolve_step(prefixes, index, step) {
            Ok(s) => steps.push(s),
            Err(e) => return invalid(e),
        }
    }

    let mut terms = Vec::new();
    if let Some(value_mapping) = &mapping.value_mapping {
        for (key, term) in &value_mapping.terms {
            // Null/empty raw value: category unobserved here, skip silently.
            let Some(local_term) = term.local_term.as_deref().filter(|s| !s.is_empty()) else {
                debug!(variable = name, term = key.as_str(), "no local term, skipping");
                continue;
            };
            let target_class =
                match resolve_curie(prefixes, "target_class", term.target_class.as_deref()) {
                    Ok(c) => c,
                    Err(e) => return invalid(format!("term `{key}`: {e}")),
                };
            terms.push(ResolvedTerm {
                key: key.clone(),
                local_term: local_term.to_string(),
                target_class,
            });
        }
    }

    ResolveOutcome::Resolved(ResolvedVariable {
        name: name.to_string(),
        predicate,
        class,
        local_definition: local_definition.to_string(),
        data_type: mapping.data_type,
        steps,
        terms,
    })
}

/// Resolve every variable of a semantic map, in deterministic order.
///
/// After individual resolution, reconstruction labels shared across
/// variables are cross-checked: a label reused with an identical
/// predicate/class/aesthetic definition dedupes to the same derived IRI,
/// while a conflicting reuse invalidates *every* variable that declares it
/// (the ambiguity is a product decision, not something to guess at).
pub fn resolve_all(map: &SemanticMap, prefixes: &PrefixMap) -> Vec<ResolveOutcome> {
    let mut outcomes: Vec<ResolveOutcome> = Vec::with_capacity(map.variable_info.len());

    for name in map.variable_names() {
        let outcome = match map.variable(name) {
            Some(Ok(mapping)) => resolve_variable(name, &mapping, prefixes),
            Some(Err(e)) => {
                warn!(variable = name, error = %e, "malformed variable entry");
                ResolveOutcome::Invalid {
                    name: name.to_string(),
                    reason: format!("malformed entry: {e}"),
                }
            }
            None => unreachable!("iterating names of the same map"),
        };
        outcomes.push(outcome);
    }

    // Shared-label conflict detection across resolved variables.
    let mut label_defs: BTreeMap<String, (String, Vec<usize>)> = BTreeMap::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        let ResolveOutcome::Resolved(var) = outcome else {
            continue;
        };
        for step in &var.steps {
            let (label, signature) = match step {
                ResolvedStep::Class(c) => (
                    &c.label,
                    format!("class/{}/{}/{}", c.predicate, c.class, c.aesthetic_label),
                ),
                ResolvedStep::Node(n) => (
                    &n.label,
                    format!("node/{}/{}/{}", n.predicate, n.class, n.aesthetic_label),
                ),
            };
            let entry = label_defs
                .entry(label.clone())
                .or_insert_with(|| (signature.clone(), Vec::new()));
            if entry.0 != signature {
                // Conflict marker: everyone touching this label is invalid.
                entry.0 = String::new();
            }
            if !entry.1.contains(&i) {
                entry.1.push(i);
            }
        }
    }
    for (label, (signature, users)) in &label_defs {
        if !signature.is_empty() {
            continue;
        }
        for &i in users {
            let name = outcomes[i].name().to_string();
            warn!(
                variable = name.as_str(),
                label = label.as_str(),
                "shared label with conflicting definition"
            );
            outcomes[i] = ResolveOutcome::Invalid {
                name,
                reason: format!("label `{label}` is shared with a conflicting definition"),
            };
        }
    }

    outcomes
}
