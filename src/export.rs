//! Export types for serializing repository state.
//!
//! These types flatten IRIs to strings so search results, import outcomes and
//! workspace mappings can be written as JSON.

use serde::{Deserialize, Serialize};

use crate::import::ImportOutcome;
use crate::model::Vocabulary;
use crate::search::FullTextSearchResult;
use crate::workspace::{VocabularyInfo, WorkspaceMetadata};

/// Exported full-text search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultExport {
    pub uri: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
    pub types: Vec<String>,
    /// Field the snippet comes from (`prefLabel`, `definition`, ...).
    pub snippet_field: String,
    /// Snippet with matches wrapped in `<em>`.
    pub snippet_text: String,
    pub score: f64,
    /// Graph the hit was found in.
    pub context: String,
}

impl From<&FullTextSearchResult> for SearchResultExport {
    fn from(r: &FullTextSearchResult) -> Self {
        Self {
            uri: r.uri.as_str().into(),
            label: r.label.clone(),
            vocabulary: r.vocabulary.as_ref().map(|v| v.as_str().into()),
            types: r.types.iter().map(|t| t.as_str().into()).collect(),
            snippet_field: r.snippet_field.clone(),
            snippet_text: r.snippet_text.clone(),
            score: r.score,
            context: r.context.as_str().into(),
        }
    }
}

/// Exported vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyExport {
    pub uri: String,
    pub context: String,
    pub label: Option<String>,
    pub glossary: Option<String>,
}

impl From<&Vocabulary> for VocabularyExport {
    fn from(v: &Vocabulary) -> Self {
        Self {
            uri: v.uri.as_str().into(),
            context: v.context.as_str().into(),
            label: v.label.clone(),
            glossary: v.glossary.as_ref().map(|g| g.as_str().into()),
        }
    }
}

/// Exported result of a committed import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcomeExport {
    pub vocabulary: VocabularyExport,
    /// Concepts left out because they are outside the vocabulary's namespace.
    pub skipped: Vec<String>,
    /// Blank-node concepts left out of the import.
    pub blank_concepts: usize,
    pub removed_terms: usize,
    pub top_concepts: usize,
    pub inserted: usize,
}

impl From<&ImportOutcome> for ImportOutcomeExport {
    fn from(o: &ImportOutcome) -> Self {
        Self {
            vocabulary: VocabularyExport::from(&o.vocabulary),
            skipped: o.skipped.iter().map(|s| s.as_str().into()).collect(),
            blank_concepts: o.blank_concepts,
            removed_terms: o.removed_terms,
            top_concepts: o.top_concepts,
            inserted: o.inserted,
        }
    }
}

/// Exported vocabulary-to-context mapping of one workspace vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyInfoExport {
    pub vocabulary: String,
    pub context: String,
    pub canonical_context: Option<String>,
    pub change_tracking_context: Option<String>,
}

impl From<&VocabularyInfo> for VocabularyInfoExport {
    fn from(info: &VocabularyInfo) -> Self {
        Self {
            vocabulary: info.uri.as_str().into(),
            context: info.context.as_str().into(),
            canonical_context: info.canonical_context.as_ref().map(|c| c.as_str().into()),
            change_tracking_context: info
                .change_tracking_context
                .as_ref()
                .map(|c| c.as_str().into()),
        }
    }
}

/// Exported workspace with its vocabularies and visible contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceExport {
    pub uri: String,
    pub label: Option<String>,
    /// Ordered by vocabulary IRI.
    pub vocabularies: Vec<VocabularyInfoExport>,
    /// Working contexts plus unshadowed canonical contexts.
    pub visible_contexts: Vec<String>,
}

impl WorkspaceExport {
    pub fn new<'a>(
        metadata: &WorkspaceMetadata,
        visible_contexts: impl IntoIterator<Item = &'a oxigraph::model::NamedNode>,
    ) -> Self {
        let mut vocabularies: Vec<VocabularyInfoExport> =
            metadata.vocabularies().map(VocabularyInfoExport::from).collect();
        vocabularies.sort_by(|a, b| a.vocabulary.cmp(&b.vocabulary));
        Self {
            uri: metadata.workspace().uri.as_str().into(),
            label: metadata.workspace().label.clone(),
            vocabularies,
            visible_contexts: visible_contexts
                .into_iter()
                .map(|c| c.as_str().into())
                .collect(),
        }
    }
}
