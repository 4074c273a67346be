//! Full-text search over terms and vocabularies, scoped to a set of contexts.

pub mod dao;
pub mod service;

use std::collections::BTreeSet;

use oxigraph::model::{NamedNode, NamedNodeRef};

pub use dao::SearchDao;
pub use service::SearchService;

/// One matching term or vocabulary in one context.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextSearchResult {
    pub uri: NamedNode,
    pub label: String,
    /// Owning vocabulary of a matching term.
    pub vocabulary: Option<NamedNode>,
    pub types: BTreeSet<NamedNode>,
    /// Local name of the field the snippet was taken from, e.g. `prefLabel`.
    pub snippet_field: String,
    /// Matching text with each occurrence of the search string in `<em>` tags.
    pub snippet_text: String,
    pub score: f64,
    /// Graph the match was found in.
    pub context: NamedNode,
}

impl FullTextSearchResult {
    pub fn has_type(&self, class: NamedNodeRef<'_>) -> bool {
        self.types.iter().any(|t| t.as_ref() == class)
    }
}
