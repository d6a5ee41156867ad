//! Derived identifiers
//!
//! Every class and node the engine introduces is addressed by a compact IRI
//! computed from the database name and a mapping-supplied label. The store
//! is never consulted: re-planning the same inputs derives the same IRIs,
//! which is what makes repeated runs safe.

use annotate_vocab::sanitize_label;

/// Compact IRI of the per-table record class (`db:{database}`)
pub fn table_iri(database: &str) -> String {
    format!("db:{database}")
}

/// Compact IRI of the class tied to a column, intermediate class label, or
/// node label (`db:{database}.{label}`)
pub fn class_iri(database: &str, label: &str) -> String {
    format!("db:{database}.{label}")
}

/// Compact IRI of the per-term class minted by the value-mapping compiler
/// (`db:{database}.{local_definition}.{sanitised term key}`)
pub fn term_class_iri(database: &str, local_definition: &str, term_key: &str) -> String {
    format!(
        "db:{database}.{local_definition}.{}",
        sanitize_label(term_key)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_keys_are_sanitised() {
        assert_eq!(
            term_class_iri("opc", "sex", "Not Otherwise Specified"),
            "db:opc.sex.not_otherwise_specified"
        );
    }

    #[test]
    fn same_inputs_same_iri() {
        assert_eq!(class_iri("opc", "demographicClass"), class_iri("opc", "demographicClass"));
    }
}
