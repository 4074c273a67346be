//! Change-tracking contexts: the graphs that receive an asset's audit records.
//!
//! A vocabulary's working context may link one change-tracking context with
//! `GRAPH <wc> { <wc> lx:hasChangeTrackingContext <ctc> }`. Without a link the
//! context is derived from the vocabulary IRI and a configured extension, so
//! repeated resolution always yields the same IRI.

use std::sync::Arc;

use oxigraph::model::{NamedNode, Triple};

use crate::context::error::{ContextError, ContextResult};
use crate::model::{Asset, Term};
use crate::ontology::lx;
use crate::store::{GraphStore, SparqlQuery, parse_iri, solution_iri};
use crate::workspace::WorkspaceMetadataProvider;

const REGISTERED_CONTEXT_QUERY: &str = r#"
SELECT DISTINCT ?changeContext WHERE {
    GRAPH ?workingContext { ?workingContext ?hasChangeTrackingContext ?changeContext . }
}
"#;

const VOCABULARY_OF_GLOSSARY_QUERY: &str = r#"
SELECT DISTINCT ?vocabulary WHERE {
    GRAPH ?anyGraph { ?vocabulary ?hasGlossary ?glossary . }
}
"#;

const VOCABULARY_OF_TERM_QUERY: &str = r#"
SELECT DISTINCT ?vocabulary WHERE {
    GRAPH ?anyGraph { ?term ?isTermOfVocabulary ?vocabulary . }
}
"#;

/// Resolves and registers change-tracking contexts in the current workspace.
#[derive(Clone)]
pub struct ChangeTrackingContextResolver {
    store: Arc<GraphStore>,
    provider: Arc<dyn WorkspaceMetadataProvider>,
    extension: String,
}

impl std::fmt::Debug for ChangeTrackingContextResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTrackingContextResolver")
            .field("extension", &self.extension)
            .finish()
    }
}

impl ChangeTrackingContextResolver {
    pub fn new(
        store: Arc<GraphStore>,
        provider: Arc<dyn WorkspaceMetadataProvider>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            extension: extension.into(),
        }
    }

    /// The context that records changes to `asset`.
    pub fn resolve_change_tracking_context(&self, asset: &Asset) -> ContextResult<NamedNode> {
        tracing::debug!(asset = %asset.uri(), "resolving change-tracking context");
        match asset {
            Asset::Vocabulary(vocabulary) => self.for_vocabulary(&vocabulary.uri),
            Asset::Term(term) => {
                let vocabulary = self.vocabulary_of(term)?;
                self.for_vocabulary(&vocabulary)
            }
            Asset::Resource(uri) => self.synthesize(uri),
        }
    }

    /// Durably link `change_context` as the change-tracking context of
    /// `vocabulary` in the current workspace, replacing any previous link.
    pub fn register(&self, vocabulary: &NamedNode, change_context: &NamedNode) -> ContextResult<()> {
        let metadata = self.provider.current_workspace_metadata()?;
        let working = metadata.vocabulary_info(vocabulary)?.context.clone();

        let mut tx = self.store.begin();
        tx.delete_values(&working, &working, lx::HAS_CHANGE_TRACKING_CONTEXT);
        tx.insert(
            &working,
            &Triple::new(
                working.clone(),
                lx::HAS_CHANGE_TRACKING_CONTEXT,
                change_context.clone(),
            ),
        );
        tx.commit()?;
        tracing::info!(
            %vocabulary,
            working_context = %working,
            change_context = %change_context,
            "registered change-tracking context"
        );
        Ok(())
    }

    fn for_vocabulary(&self, vocabulary: &NamedNode) -> ContextResult<NamedNode> {
        let metadata = self.provider.current_workspace_metadata()?;
        let working = metadata.vocabulary_info(vocabulary)?.context.clone();

        let query = SparqlQuery::new(REGISTERED_CONTEXT_QUERY)
            .bind_iri("workingContext", &working)
            .bind_iri("hasChangeTrackingContext", lx::HAS_CHANGE_TRACKING_CONTEXT);
        let mut registered: Vec<NamedNode> = self
            .store
            .select(&query.render())?
            .iter()
            .filter_map(|row| solution_iri(row, "changeContext"))
            .collect();

        match registered.len() {
            0 => self.synthesize(vocabulary),
            1 => Ok(registered.remove(0)),
            n => Err(ContextError::ConsistencyViolation {
                subject: working.as_str().into(),
                message: format!("{n} change-tracking contexts are registered, expected at most one"),
            }),
        }
    }

    /// Owning vocabulary of a term. The glossary link is authoritative when the
    /// term knows its glossary; the direct term-to-vocabulary link is used otherwise.
    fn vocabulary_of(&self, term: &Term) -> ContextResult<NamedNode> {
        let query = match &term.glossary {
            Some(glossary) => SparqlQuery::new(VOCABULARY_OF_GLOSSARY_QUERY)
                .bind_iri("glossary", glossary)
                .bind_iri("hasGlossary", lx::HAS_GLOSSARY),
            None => SparqlQuery::new(VOCABULARY_OF_TERM_QUERY)
                .bind_iri("term", &term.uri)
                .bind_iri("isTermOfVocabulary", lx::IS_TERM_OF_VOCABULARY),
        };
        let mut found: Vec<NamedNode> = self
            .store
            .select(&query.render())?
            .iter()
            .filter_map(|row| solution_iri(row, "vocabulary"))
            .collect();

        if found.len() != 1 {
            return Err(ContextError::ConsistencyViolation {
                subject: term.uri.as_str().into(),
                message: format!("term resolves to {} vocabularies, expected exactly one", found.len()),
            });
        }
        Ok(found.remove(0))
    }

    fn synthesize(&self, uri: &NamedNode) -> ContextResult<NamedNode> {
        Ok(parse_iri(format!("{}{}", uri.as_str(), self.extension))?)
    }
}
