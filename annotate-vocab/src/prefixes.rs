//! The prefix table shared by the resolver and the operation builders

use std::collections::{BTreeMap, BTreeSet};

use crate::curie::Curie;
use crate::error::{VocabError, VocabResult};
use crate::ns;

/// Immutable prefix → namespace table.
///
/// Built once per run from the engine defaults plus any extra prefixes the
/// semantic map declares, then passed by reference into validation and query
/// rendering. Emitted queries declare exactly the prefixes they reference,
/// so the table never leaks unused declarations into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    /// The built-in table: the structural vocabularies every operation uses
    /// plus the clinical ontologies the original mapping files rely on.
    pub fn defaults() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("db".to_string(), ns::DB.to_string());
        entries.insert("dbo".to_string(), ns::DBO.to_string());
        entries.insert("rdf".to_string(), ns::RDF.to_string());
        entries.insert("rdfs".to_string(), ns::RDFS.to_string());
        entries.insert("owl".to_string(), ns::OWL.to_string());
        entries.insert("roo".to_string(), ns::ROO.to_string());
        entries.insert("ncit".to_string(), ns::NCIT.to_string());
        PrefixMap { entries }
    }

    /// Extend the table with map-supplied prefixes. Extras win on collision
    /// so a mapping can repoint an ontology at a local mirror.
    pub fn with_extras<I>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (prefix, iri) in extras {
            self.entries.insert(prefix, iri);
        }
        self
    }

    /// Whether a prefix is declared
    pub fn contains(&self, prefix: &str) -> bool {
        self.entries.contains_key(prefix)
    }

    /// Namespace IRI for a prefix
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(|s| s.as_str())
    }

    /// Validate that a curie's prefix is declared in this table.
    pub fn check(&self, curie: &Curie) -> VocabResult<()> {
        if self.contains(curie.prefix()) {
            Ok(())
        } else {
            Err(VocabError::UnknownPrefix(
                curie.prefix().to_string(),
                curie.to_string(),
            ))
        }
    }

    /// Parse and validate a compact IRI in one step.
    pub fn resolve(&self, value: &str) -> VocabResult<Curie> {
        let curie = Curie::parse(value)?;
        self.check(&curie)?;
        Ok(curie)
    }

    /// Render `PREFIX` declarations for exactly the given prefixes, in
    /// deterministic (sorted) order. Unknown prefixes are skipped; callers
    /// validate curies before rendering.
    pub fn declarations(&self, used: &BTreeSet<String>) -> String {
        let mut out = String::new();
        for prefix in used {
            if let Some(iri) = self.entries.get(prefix) {
                out.push_str(&format!("PREFIX {prefix}: <{iri}>\n"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_structural_prefixes() {
        let p = PrefixMap::defaults();
        for prefix in ["db", "dbo", "rdf", "rdfs", "owl", "roo", "ncit"] {
            assert!(p.contains(prefix), "missing default prefix {prefix}");
        }
    }

    #[test]
    fn extras_override_defaults() {
        let p = PrefixMap::defaults()
            .with_extras([("ncit".to_string(), "http://mirror.local/ncit#".to_string())]);
        assert_eq!(p.namespace("ncit"), Some("http://mirror.local/ncit#"));
    }

    #[test]
    fn resolve_rejects_undeclared_prefix() {
        let p = PrefixMap::defaults();
        assert!(matches!(
            p.resolve("mesh:D000091569"),
            Err(VocabError::UnknownPrefix(_, _))
        ));
        let p = p.with_extras([("mesh".to_string(), "http://id.nlm.nih.gov/mesh/".to_string())]);
        assert!(p.resolve("mesh:D000091569").is_ok());
    }

    #[test]
    fn declarations_emit_only_used_prefixes() {
        let p = PrefixMap::defaults();
        let used: BTreeSet<String> = ["owl".to_string(), "db".to_string()].into();
        let rendered = p.declarations(&used);
        assert!(rendered.contains("PREFIX db:"));
        assert!(rendered.contains("PREFIX owl:"));
        assert!(!rendered.contains("PREFIX ncit:"));
    }
}
