//! Per-variable planning
//!
//! Turns a resolved variable into an ordered operation list. The order is
//! load-bearing: class constructions run first so the attachment's WHERE
//! patterns can bind their row individuals, the attachment follows, then
//! node declarations and term classes whose derived IRIs need no prior
//! bindings.

use annotate_map::{Placement, ResolvedStep, ResolvedVariable};
use annotate_vocab::PrefixMap;
use tracing::debug;

use crate::build::{
    ask_class, ask_node, ask_term, ask_variable, ClassConstruction, NodeConstruction,
    TermConstruction, VariableAttachment,
};
use crate::op::{AskOp, UpdateOp, VariablePlan};

/// Plan every operation for one resolved variable.
///
/// Planning is pure and deterministic: the same inputs always render a
/// byte-identical plan.
pub fn plan_variable(
    database: &str,
    variable: &ResolvedVariable,
    prefixes: &PrefixMap,
) -> VariablePlan {
    // Stable partition of class steps by placement; nodes keep array order.
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut nodes = Vec::new();
    for step in &variable.steps {
        match step {
            ResolvedStep::Class(c) if c.placement == Placement::After => after.push(c),
            ResolvedStep::Class(c) => before.push(c),
            ResolvedStep::Node(n) => nodes.push(n),
        }
    }

    let mut operations: Vec<UpdateOp> = Vec::new();
    let mut verification: Vec<AskOp> = Vec::new();

    for step in before.iter().chain(after.iter()).copied() {
        operations.push(ClassConstruction { database, step }.build(prefixes));
        verification.push(ask_class(database, step, prefixes));
    }

    operations.push(
        VariableAttachment {
            database,
            variable,
            before: &before,
            after: &after,
            nodes: &nodes,
        }
        .build(prefixes),
    );
    verification.push(ask_variable(database, variable, prefixes));

    for step in nodes.iter().copied() {
        operations.push(NodeConstruction { database, step }.build(prefixes));
        verification.push(ask_node(database, step, prefixes));
    }

    for term in &variable.terms {
        operations.push(
            TermConstruction {
                database,
                local_definition: &variable.local_definition,
                term,
            }
            .build(prefixes),
        );
        verification.push(ask_term(
            database,
            &variable.local_definition,
            term,
            prefixes,
        ));
    }

    debug!(
        variable = variable.name.as_str(),
        operations = operations.len(),
        "variable planned"
    );

    VariablePlan {
        variable: variable.name.clone(),
        operations,
        verification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::OpKind;
    use annotate_map::{resolve_variable, ResolveOutcome, VariableMapping};

    fn resolved(json: &str) -> ResolvedVariable {
        let mapping: VariableMapping = serde_json::from_str(json).unwrap();
        match resolve_variable("v", &mapping, &PrefixMap::defaults()) {
            ResolveOutcome::Resolved(v) => v,
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[test]
    fn empty_reconstruction_plans_single_attachment() {
        let var = resolved(
            r#"{"predicate": "roo:P100018", "class": "ncit:C28421", "local_definition": "sex"}"#,
        );
        let plan = plan_variable("opc", &var, &PrefixMap::defaults());
        assert_eq!(plan.operations.len(), 1);
        assert_eq!(plan.operations[0].kind, OpKind::AnnotateVariable);
        let sparql = &plan.operations[0].sparql;
        assert!(sparql.contains("db:opc.sex owl:equivalentClass ncit:C28421 ."));
        assert!(sparql.contains("?row roo:P100018 ?component1 ."));
        assert!(sparql.contains("?component1 rdf:type db:opc.sex ."));
    }

    #[test]
    fn before_steps_chain_in_array_order() {
        let var = resolved(
            r#"{"predicate": "roo:P100027", "class": "ncit:C25150", "local_definition": "age",
                "schema_reconstruction": [
                    {"type": "class", "predicate": "roo:P1000", "class": "ncit:C100",
                     "class_label": "outer", "aesthetic_label": "Outer"},
                    {"type": "class", "predicate": "roo:P1001", "class": "ncit:C101",
                     "class_label": "inner", "aesthetic_label": "Inner"}
                ]}"#,
        );
        let plan = plan_variable("opc", &var, &PrefixMap::defaults());
        assert_eq!(plan.operations.len(), 3);
        assert_eq!(plan.operations[0].label, "class_outer");
        assert_eq!(plan.operations[1].label, "class_inner");
        let attachment = &plan.operations[2].sparql;
        assert!(attachment.contains("?row roo:P1000 ?component1 ."));
        assert!(attachment.contains("?component1 roo:P1001 ?component2 ."));
        assert!(attachment.contains("?component2 roo:P100027 ?component3 ."));
        assert!(attachment.contains("?component3 rdf:type db:opc.age ."));
    }

    #[test]
    fn after_step_order_is_observable() {
        let steps = |order: [&str; 2]| {
            resolved(&format!(
                r#"{{"predicate": "roo:P1", "class": "ncit:C1", "local_definition": "v",
                    "schema_reconstruction": [
                        {{"type": "class", "placement": "after", "predicate": "roo:P{0}",
                         "class": "ncit:C{0}", "class_label": "s{0}", "aesthetic_label": "S{0}"}},
                        {{"type": "class", "placement": "after", "predicate": "roo:P{1}",
                         "class": "ncit:C{1}", "class_label": "s{1}", "aesthetic_label": "S{1}"}}
                    ]}}"#,
                order[0], order[1]
            ))
        };
        let prefixes = PrefixMap::defaults();
        let forward = plan_variable("opc", &steps(["8", "9"]), &prefixes);
        let reversed = plan_variable("opc", &steps(["9", "8"]), &prefixes);
        let attachment = |p: &VariablePlan| {
            p.operations
                .iter()
                .find(|o| o.kind == OpKind::AnnotateVariable)
                .map(|o| o.sparql.clone())
                .unwrap()
        };
        assert_ne!(attachment(&forward), attachment(&reversed));
        assert!(attachment(&forward).contains("?component1 roo:P8 ?component2 ."));
        assert!(attachment(&forward).contains("?component2 roo:P9 ?component3 ."));
        assert!(attachment(&reversed).contains("?component1 roo:P9 ?component2 ."));
    }

    #[test]
    fn replanning_is_byte_identical() {
        let var = resolved(
            r#"{"predicate": "roo:P100018", "class": "ncit:C28421", "local_definition": "sex",
                "value_mapping": {"terms": {
                    "male": {"local_term": "man", "target_class": "ncit:C20197"}
                }}}"#,
        );
        let prefixes = PrefixMap::defaults();
        let first = plan_variable("opc", &var, &prefixes);
        let second = plan_variable("opc", &var, &prefixes);
        assert_eq!(first, second);
    }

    #[test]
    fn terms_emit_intersection_classes_in_key_order() {
        let var = resolved(
            r#"{"predicate": "roo:P100018", "class": "ncit:C28421", "local_definition": "sex",
                "value_mapping": {"terms": {
                    "male": {"local_term": "man", "target_class": "ncit:C20197"},
                    "female": {"local_term": "vrouw", "target_class": "ncit:C16576"}
                }}}"#,
        );
        let plan = plan_variable("opc", &var, &PrefixMap::defaults());
        // 1 attachment + 2 terms, female first (key order)
        assert_eq!(plan.operations.len(), 3);
        assert_eq!(plan.operations[1].label, "term_female");
        assert_eq!(plan.operations[2].label, "term_male");
        let female = &plan.operations[1].sparql;
        assert!(female.contains("db:opc.sex.female rdf:type owl:Class ;"));
        assert!(female.contains("rdfs:subClassOf ncit:C16576 ;"));
        assert!(female.contains("owl:hasValue \"vrouw\""));
        assert!(female.contains("owl:onProperty dbo:has_value"));
        assert!(female.contains("db:opc.sex\n"));
    }

    #[test]
    fn construct_class_guards_against_rerun() {
        let var = resolved(
            r#"{"predicate": "roo:P1", "class": "ncit:C1", "local_definition": "v",
                "schema_reconstruction": [
                    {"type": "class", "predicate": "roo:P2", "class": "ncit:C2",
                     "class_label": "demographicClass", "aesthetic_label": "Demographic"}
                ]}"#,
        );
        let plan = plan_variable("opc", &var, &PrefixMap::defaults());
        let construct = &plan.operations[0].sparql;
        assert!(construct.contains("FILTER NOT EXISTS"));
        assert!(construct.contains("?existing rdf:type db:opc.demographicClass ."));
    }

    #[test]
    fn verification_covers_every_operation() {
        let var = resolved(
            r#"{"predicate": "roo:P1", "class": "ncit:C1", "local_definition": "v",
                "schema_reconstruction": [
                    {"type": "class", "predicate": "roo:P2", "class": "ncit:C2",
                     "class_label": "c", "aesthetic_label": "C"},
                    {"type": "node", "predicate": "roo:P3", "class": "ncit:C3",
                     "node_label": "n", "aesthetic_label": "N"}
                ],
                "value_mapping": {"terms": {
                    "male": {"local_term": "man", "target_class": "ncit:C20197"}
                }}}"#,
        );
        let plan = plan_variable("opc", &var, &PrefixMap::defaults());
        assert_eq!(plan.operations.len(), plan.verification.len());
        for (op, check) in plan.operations.iter().zip(&plan.verification) {
            assert_eq!(op.label, check.label);
            assert!(check.sparql.contains("ASK {"));
        }
    }
}
