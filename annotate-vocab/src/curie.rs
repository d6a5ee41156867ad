//! Compact IRI (`prefix:local`) parsing and validation

use std::fmt;

use crate::error::{VocabError, VocabResult};

/// A validated compact IRI such as `ncit:C28421` or `roo:P100018`.
///
/// Both halves are checked at parse time so that downstream query builders
/// can interpolate a `Curie` without re-validating it: the prefix must look
/// like a SPARQL prefix name and the local part must be free of whitespace
/// and IRI delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Curie {
    prefix: String,
    local: String,
}

impl Curie {
    /// Parse a compact identifier, rejecting anything that could not appear
    /// verbatim in a SPARQL query.
    pub fn parse(value: &str) -> VocabResult<Self> {
        let trimmed = value.trim();
        let (prefix, local) = trimmed.split_once(':').ok_or_else(|| {
            VocabError::InvalidCurie(value.to_string(), "missing `:` separator".to_string())
        })?;

        // The original mapping files occasionally carry a stray space after
        // the colon ("roo: P100018"); tolerate it.
        let local = local.trim_start();

        if prefix.is_empty() || !prefix.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(VocabError::InvalidCurie(
                value.to_string(),
                "prefix must start with a letter".to_string(),
            ));
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VocabError::InvalidCurie(
                value.to_string(),
                "prefix contains invalid characters".to_string(),
            ));
        }
        if local.is_empty() {
            return Err(VocabError::InvalidCurie(
                value.to_string(),
                "empty local part".to_string(),
            ));
        }
        if local
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\'))
        {
            return Err(VocabError::InvalidCurie(
                value.to_string(),
                "local part contains whitespace or IRI delimiters".to_string(),
            ));
        }

        Ok(Curie {
            prefix: prefix.to_string(),
            local: local.to_string(),
        })
    }

    /// The prefix half (`ncit` in `ncit:C28421`)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The local half (`C28421` in `ncit:C28421`)
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_curie() {
        let c = Curie::parse("ncit:C28421").unwrap();
        assert_eq!(c.prefix(), "ncit");
        assert_eq!(c.local(), "C28421");
        assert_eq!(c.to_string(), "ncit:C28421");
    }

    #[test]
    fn tolerates_space_after_colon() {
        let c = Curie::parse("roo: P100018").unwrap();
        assert_eq!(c.to_string(), "roo:P100018");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(matches!(
            Curie::parse("C28421"),
            Err(VocabError::InvalidCurie(_, _))
        ));
    }

    #[test]
    fn rejects_empty_local() {
        assert!(Curie::parse("ncit:").is_err());
        assert!(Curie::parse("ncit:  ").is_err());
    }

    #[test]
    fn rejects_delimiters_in_local() {
        assert!(Curie::parse("ncit:C28 421").is_err());
        assert!(Curie::parse("ncit:<C28421>").is_err());
    }

    #[test]
    fn rejects_numeric_prefix() {
        assert!(Curie::parse("1abc:C1").is_err());
    }
}
