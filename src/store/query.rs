//! SPARQL templates with named parameters.
//!
//! A template is plain SPARQL whose variables double as parameters: binding
//! `name` replaces every standalone `?name` (or `$name`) token with an IRI, a
//! literal, or raw query text. Unbound variables stay variables.

use std::collections::HashMap;

use oxigraph::model::{LiteralRef, NamedNodeRef};

/// A parametrized SPARQL query.
#[derive(Debug, Clone)]
pub struct SparqlQuery {
    template: String,
    bindings: HashMap<String, String>,
}

impl SparqlQuery {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            bindings: HashMap::new(),
        }
    }

    /// Bind `name` to an IRI.
    pub fn bind_iri<'a>(mut self, name: &str, iri: impl Into<NamedNodeRef<'a>>) -> Self {
        self.bindings.insert(name.to_string(), iri.into().to_string());
        self
    }

    /// Bind `name` to a plain string literal (escaped).
    pub fn bind_literal(mut self, name: &str, value: &str) -> Self {
        self.bindings
            .insert(name.to_string(), LiteralRef::new_simple_literal(value).to_string());
        self
    }

    /// Bind `name` to raw query text, inserted verbatim.
    ///
    /// Used where the binder has no typed form, e.g. an IRI list inside `IN (...)`.
    pub fn bind_untyped(mut self, name: &str, raw: impl Into<String>) -> Self {
        self.bindings.insert(name.to_string(), raw.into());
        self
    }

    /// Render the template with all bindings substituted.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut chars = self.template.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if c != '?' && c != '$' {
                out.push(c);
                continue;
            }
            let mut end = start + c.len_utf8();
            while let Some(&(idx, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    end = idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let token = &self.template[start..end];
            match self.bindings.get(&token[1..]) {
                Some(value) if token.len() > 1 => out.push_str(value),
                _ => out.push_str(token),
            }
        }
        out
    }
}

/// Comma-separated `<iri>` list for use inside `IN (...)` or `VALUES`.
pub fn iri_list<'a, I, N>(iris: I) -> String
where
    I: IntoIterator<Item = N>,
    N: Into<NamedNodeRef<'a>>,
{
    iris.into_iter()
        .map(|iri| iri.into().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use oxigraph::model::NamedNode;

    use super::*;

    #[test]
    fn binds_whole_variable_tokens_only() {
        let g = NamedNode::new("http://x/g").unwrap();
        let rendered = SparqlQuery::new("SELECT ?glossary WHERE { GRAPH ?g { ?glossary ?p ?g } }")
            .bind_iri("g", &g)
            .render();
        assert_eq!(
            rendered,
            "SELECT ?glossary WHERE { GRAPH <http://x/g> { ?glossary ?p <http://x/g> } }"
        );
    }

    #[test]
    fn literals_are_escaped() {
        let rendered = SparqlQuery::new("FILTER(CONTAINS(?text, ?searchString))")
            .bind_literal("searchString", "say \"hi\"")
            .render();
        assert_eq!(rendered, r#"FILTER(CONTAINS(?text, "say \"hi\""))"#);
    }

    #[test]
    fn untyped_binding_is_verbatim() {
        let a = NamedNode::new("http://x/a").unwrap();
        let b = NamedNode::new("http://x/b").unwrap();
        let rendered = SparqlQuery::new("FILTER (?g IN (?contexts))")
            .bind_untyped("contexts", iri_list([&a, &b]))
            .render();
        assert_eq!(rendered, "FILTER (?g IN (<http://x/a>, <http://x/b>))");
    }

    #[test]
    fn lone_question_mark_is_kept() {
        let rendered = SparqlQuery::new("a ? b").bind_literal("x", "y").render();
        assert_eq!(rendered, "a ? b");
    }

    #[test]
    fn dollar_variables_are_bound_too() {
        let rendered = SparqlQuery::new("SELECT $x WHERE { $x ?p $y }")
            .bind_untyped("y", "?x")
            .render();
        assert_eq!(rendered, "SELECT $x WHERE { $x ?p ?x }");
    }
}
