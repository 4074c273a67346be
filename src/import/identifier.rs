//! Identifier rules: namespaces of vocabularies and terms, fresh term IRIs.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Namespace built from `base` followed by `components`, always ending in `/`.
///
/// `build_namespace("http://x/voc1", &["/term"])` is `http://x/voc1/term/`.
pub fn build_namespace(base: &str, components: &[&str]) -> String {
    let mut namespace = base.trim_end_matches('/').to_string();
    for component in components {
        let component = component.trim_matches('/');
        if component.is_empty() {
            continue;
        }
        namespace.push('/');
        namespace.push_str(component);
    }
    namespace.push('/');
    namespace
}

/// Everything up to and including the last `/` or `#` of `iri`.
///
/// Returns `None` when the IRI has neither separator.
pub fn extract_identifier_namespace(iri: &str) -> Option<&str> {
    let end = iri.rfind(|c: char| c == '/' || c == '#')?;
    Some(&iri[..=end])
}

/// Normalize a label into an identifier local name: diacritics are stripped,
/// letters lowercased, whitespace runs collapse into `-`, and characters that
/// are neither alphanumeric nor `-`/`_` are dropped.
pub fn normalize(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.trim().nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() {
            pending_dash = !out.is_empty();
            continue;
        }
        if !(c.is_alphanumeric() || c == '-' || c == '_') {
            continue;
        }
        if pending_dash {
            out.push('-');
            pending_dash = false;
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Fresh term IRI inside the vocabulary's term namespace.
pub fn generate_term_identifier(vocabulary: &str, separator: &str, label: &str) -> String {
    format!("{}{}", build_namespace(vocabulary, &[separator]), normalize(label))
}
