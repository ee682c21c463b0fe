//! Namespace-token substitution
//!
//! Manifest text may carry namespace tokens that resolve differently
//! depending on whether the run targets a managed package. Injection
//! applies to manifest text and caller-supplied api names only, never
//! to entity file contents.

/// Token replaced with `<prefix>__` in managed mode, or removed.
pub const NAMESPACE_TOKEN: &str = "%%%NAMESPACE%%%";

/// Token replaced with the bare prefix in managed mode, or `c`.
pub const NAMESPACE_OR_C_TOKEN: &str = "%%%NAMESPACE_OR_C%%%";

/// Substitute namespace tokens in `text`.
pub fn inject_namespace(text: &str, namespace: Option<&str>, managed: bool) -> String {
    let (prefix, bare) = match namespace {
        Some(ns) if managed => (format!("{ns}__"), ns.to_string()),
        _ => (String::new(), "c".to_string()),
    };
    text.replace(NAMESPACE_TOKEN, &prefix)
        .replace(NAMESPACE_OR_C_TOKEN, &bare)
}
