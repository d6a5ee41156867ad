//! Operation builders
//!
//! Each builder takes a typed parameter record and renders one operation.
//! Rendering goes through [`QueryBuf`], which tracks the prefixes a query
//! actually references so the emitted header declares exactly those and
//! nothing else.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use annotate_map::{ClassStep, NodeStep, ResolvedTerm, ResolvedVariable};
use annotate_vocab::{dbo, Curie, PrefixMap, ANNOTATION_GRAPH};

use crate::ids;
use crate::op::{AskOp, OpKind, UpdateOp};

/// Accumulates query text and the set of prefixes it references.
pub(crate) struct QueryBuf {
    used: BTreeSet<String>,
    body: String,
}

impl QueryBuf {
    pub(crate) fn new() -> Self {
        QueryBuf {
            used: BTreeSet::new(),
            body: String::new(),
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Render a resolved curie, recording its prefix as used.
    pub(crate) fn curie(&mut self, curie: &Curie) -> String {
        self.used.insert(curie.prefix().to_string());
        curie.to_string()
    }

    /// Record a prefix referenced by hand-assembled compact IRIs
    /// (`db:` derived identifiers, `dbo:` structural predicates).
    pub(crate) fn mark(&mut self, prefix: &str) {
        self.used.insert(prefix.to_string());
    }

    pub(crate) fn finish(self, prefixes: &PrefixMap) -> String {
        let mut out = prefixes.declarations(&self.used);
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

/// Escape a string for use inside a double-quoted SPARQL literal.
fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Parameters for declaring one intermediate class and minting its row
/// individuals.
pub struct ClassConstruction<'a> {
    pub database: &'a str,
    pub step: &'a ClassStep,
}

impl ClassConstruction<'_> {
    pub fn build(&self, prefixes: &PrefixMap) -> UpdateOp {
        let mut q = QueryBuf::new();
        q.mark("db");
        q.mark("dbo");
        q.mark("rdf");
        q.mark("rdfs");
        q.mark("owl");
        let class_iri = ids::class_iri(self.database, &self.step.label);
        let table_iri = ids::table_iri(self.database);
        let target = q.curie(&self.step.class);
        let label = escape_literal(&self.step.aesthetic_label);

        q.line("INSERT {");
        q.line(&format!("  GRAPH <{ANNOTATION_GRAPH}> {{"));
        q.line(&format!("    {class_iri} rdf:type owl:Class ;"));
        q.line(&format!("        owl:equivalentClass {target} ;"));
        q.line(&format!("        rdfs:label \"{label}\" ."));
        q.line(&format!("    ?row {} ?component .", dbo::HAS_COLUMN));
        q.line(&format!("    ?component rdf:type {class_iri} ."));
        q.line("  }");
        q.line("}");
        q.line("WHERE {");
        q.line(&format!("  ?row rdf:type {table_iri} ."));
        q.line(&format!(
            "  BIND(IRI(CONCAT(STR(?row), \"/{}\")) AS ?component)",
            self.step.label
        ));
        q.line("  FILTER NOT EXISTS {");
        q.line(&format!("    ?row {} ?existing .", dbo::HAS_COLUMN));
        q.line(&format!("    ?existing rdf:type {class_iri} ."));
        q.line("  }");
        q.line("}");

        UpdateOp {
            kind: OpKind::ConstructClass,
            label: format!("class_{}", self.step.label),
            sparql: q.finish(prefixes),
        }
    }
}

/// Parameters for declaring one leaf node individual.
pub struct NodeConstruction<'a> {
    pub database: &'a str,
    pub step: &'a NodeStep,
}

impl NodeConstruction<'_> {
    pub fn build(&self, prefixes: &PrefixMap) -> UpdateOp {
        let mut q = QueryBuf::new();
        q.mark("db");
        q.mark("rdf");
        q.mark("rdfs");
        let node_iri = ids::class_iri(self.database, &self.step.label);
        let class = q.curie(&self.step.class);
        let label = escape_literal(&self.step.aesthetic_label);

        q.line("INSERT DATA {");
        q.line(&format!("  GRAPH <{ANNOTATION_GRAPH}> {{"));
        q.line(&format!("    {node_iri} rdf:type {class} ;"));
        q.line(&format!("        rdfs:label \"{label}\" ."));
        q.line("  }");
        q.line("}");

        UpdateOp {
            kind: OpKind::ConstructNode,
            label: format!("node_{}", self.step.label),
            sparql: q.finish(prefixes),
        }
    }
}

/// Parameters for the variable attachment: the equivalence assertion plus
/// the ownership chain through any reconstructed intermediate classes.
pub struct VariableAttachment<'a> {
    pub database: &'a str,
    pub variable: &'a ResolvedVariable,
    /// Before-placement class steps, original order (nearest the record first)
    pub before: &'a [&'a ClassStep],
    /// After-placement class steps, original order (nearest the variable first)
    pub after: &'a [&'a ClassStep],
    pub nodes: &'a [&'a NodeStep],
}

impl VariableAttachment<'_> {
    pub fn build(&self, prefixes: &PrefixMap) -> UpdateOp {
        let mut q = QueryBuf::new();
        q.mark("db");
        q.mark("dbo");
        q.mark("rdf");
        q.mark("owl");
        let table_iri = ids::table_iri(self.database);
        let variable_iri = ids::class_iri(self.database, &self.variable.local_definition);
        let equivalent = q.curie(&self.variable.class);

        // Chain component bindings, walking from the record outward:
        // before classes, then the variable itself, then after classes.
        // Component numbering follows that walk.
        let mut components: Vec<(String, String)> = Vec::new();
        for step in self.before {
            components.push((
                ids::class_iri(self.database, &step.label),
                q.curie(&step.predicate),
            ));
        }
        components.push((variable_iri.clone(), q.curie(&self.variable.predicate)));
        for step in self.after {
            components.push((
                ids::class_iri(self.database, &step.label),
                q.curie(&step.predicate),
            ));
        }
        let variable_component = format!("?component{}", self.before.len() + 1);

        let mut insert = String::new();
        let mut where_clause = String::new();
        let _ = writeln!(where_clause, "  ?row rdf:type {table_iri} .");
        let mut subject = "?row".to_string();
        for (index, (class_iri, predicate)) in components.iter().enumerate() {
            let component = format!("?component{}", index + 1);
            let _ = writeln!(insert, "    {subject} {predicate} {component} .");
            let _ = writeln!(where_clause, "  ?row {} {component} .", dbo::HAS_COLUMN);
            let _ = writeln!(where_clause, "  {component} rdf:type {class_iri} .");
            subject = component;
        }
        for step in self.nodes {
            let predicate = q.curie(&step.predicate);
            let node_iri = ids::class_iri(self.database, &step.label);
            let _ = writeln!(insert, "    {variable_component} {predicate} {node_iri} .");
        }

        q.line("INSERT {");
        q.line(&format!("  GRAPH <{ANNOTATION_GRAPH}> {{"));
        q.line(&format!(
            "    {variable_iri} owl:equivalentClass {equivalent} ."
        ));
        q.body.push_str(&insert);
        q.line("  }");
        q.line("}");
        q.line("WHERE {");
        q.body.push_str(&where_clause);
        q.line("}");

        UpdateOp {
            kind: OpKind::AnnotateVariable,
            label: "attachment".to_string(),
            sparql: q.finish(prefixes),
        }
    }
}

/// Parameters for one categorical term's intersection class.
pub struct TermConstruction<'a> {
    pub database: &'a str,
    pub local_definition: &'a str,
    pub term: &'a ResolvedTerm,
}

impl TermConstruction<'_> {
    pub fn build(&self, prefixes: &PrefixMap) -> UpdateOp {
        let mut q = QueryBuf::new();
        q.mark("db");
        q.mark("dbo");
        q.mark("rdf");
        q.mark("rdfs");
        q.mark("owl");
        let term_iri = ids::term_class_iri(self.database, self.local_definition, &self.term.key);
        let variable_iri = ids::class_iri(self.database, self.local_definition);
        let target = q.curie(&self.term.target_class);
        let value = escape_literal(&self.term.local_term);

        q.line("INSERT DATA {");
        q.line(&format!("  GRAPH <{ANNOTATION_GRAPH}> {{"));
        q.line(&format!("    {term_iri} rdf:type owl:Class ;"));
        q.line(&format!("        rdfs:subClassOf {target} ;"));
        q.line("        owl:equivalentClass [");
        q.line("            rdf:type owl:Class ;");
        q.line("            owl:intersectionOf (");
        q.line("                [ rdf:type owl:Restriction ;");
        q.line(&format!("                  owl:onProperty {} ;", dbo::HAS_VALUE));
        q.line(&format!("                  owl:hasValue \"{value}\" ]"));
        q.line(&format!("                {variable_iri}"));
        q.line("            )");
        q.line("        ] .");
        q.line("  }");
        q.line("}");

        UpdateOp {
            kind: OpKind::MapTerm,
            label: format!("term_{}", annotate_vocab::sanitize_label(&self.term.key)),
            sparql: q.finish(prefixes),
        }
    }
}

fn ask(prefixes: &PrefixMap, label: String, mut q: QueryBuf, pattern: &str) -> AskOp {
    q.line(&format!("ASK {{ GRAPH <{ANNOTATION_GRAPH}> {{ {pattern} }} }}"));
    AskOp {
        label,
        sparql: q.finish(prefixes),
    }
}

/// `ASK` that the variable's equivalence assertion landed.
pub fn ask_variable(database: &str, variable: &ResolvedVariable, prefixes: &PrefixMap) -> AskOp {
    let mut q = QueryBuf::new();
    q.mark("db");
    q.mark("owl");
    let variable_iri = ids::class_iri(database, &variable.local_definition);
    let class = q.curie(&variable.class);
    ask(
        prefixes,
        "attachment".to_string(),
        q,
        &format!("{variable_iri} owl:equivalentClass {class} ."),
    )
}

/// `ASK` that an intermediate class was declared.
pub fn ask_class(database: &str, step: &ClassStep, prefixes: &PrefixMap) -> AskOp {
    let mut q = QueryBuf::new();
    q.mark("db");
    q.mark("owl");
    let class_iri = ids::class_iri(database, &step.label);
    let class = q.curie(&step.class);
    ask(
        prefixes,
        format!("class_{}", step.label),
        q,
        &format!("{class_iri} owl:equivalentClass {class} ."),
    )
}

/// `ASK` that a node individual was declared.
pub fn ask_node(database: &str, step: &NodeStep, prefixes: &PrefixMap) -> AskOp {
    let mut q = QueryBuf::new();
    q.mark("db");
    q.mark("rdf");
    let node_iri = ids::class_iri(database, &step.label);
    let class = q.curie(&step.class);
    ask(
        prefixes,
        format!("node_{}", step.label),
        q,
        &format!("{node_iri} rdf:type {class} ."),
    )
}

/// `ASK` that a term's subclass assertion landed.
pub fn ask_term(
    database: &str,
    local_definition: &str,
    term: &ResolvedTerm,
    prefixes: &PrefixMap,
) -> AskOp {
    let mut q = QueryBuf::new();
    q.mark("db");
    q.mark("rdfs");
    let term_iri = ids::term_class_iri(database, local_definition, &term.key);
    let target = q.curie(&term.target_class);
    ask(
        prefixes,
        format!("term_{}", annotate_vocab::sanitize_label(&term.key)),
        q,
        &format!("{term_iri} rdfs:subClassOf {target} ."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_escaping() {
        assert_eq!(escape_literal(r#"5'10" tall"#), r#"5'10\" tall"#);
        assert_eq!(escape_literal("a\\b"), "a\\\\b");
    }

    #[test]
    fn query_buf_declares_only_used_prefixes() {
        let prefixes = PrefixMap::defaults();
        let mut q = QueryBuf::new();
        q.mark("db");
        let rendered = q.curie(&prefixes.resolve("ncit:C28421").unwrap());
        q.line(&format!("ASK {{ db:x a {rendered} }}"));
        let out = q.finish(&prefixes);
        assert!(out.contains("PREFIX db:"));
        assert!(out.contains("PREFIX ncit:"));
        assert!(!out.contains("PREFIX rdfs:"));
    }
}
