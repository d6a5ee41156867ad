//! IRI-safe local identifier derivation

/// Derive a stable, IRI-safe local identifier from a human-readable label.
///
/// Lowercases, maps whitespace runs to a single `_`, and drops anything
/// outside `[a-z0-9_]`. Used for per-term class identifiers, so two runs
/// over the same input always derive the same identifier.
pub fn sanitize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_sep = true;
    for c in label.trim().chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_sep {
                out.push('_');
                last_was_sep = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
