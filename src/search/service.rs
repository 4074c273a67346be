//! Workspace-scoped search entry points.

use std::collections::BTreeSet;

use oxigraph::model::NamedNode;

use crate::context::{ContextError, ContextResolver, ContextResult};
use crate::ontology::skos;
use crate::search::{FullTextSearchResult, SearchDao};

/// Search restricted to what the current workspace can see.
#[derive(Debug, Clone)]
pub struct SearchService {
    dao: SearchDao,
    resolver: ContextResolver,
}

impl SearchService {
    pub fn new(dao: SearchDao, resolver: ContextResolver) -> Self {
        Self { dao, resolver }
    }

    /// Terms and vocabularies matching `search` in the current workspace's
    /// working contexts and the canonical contexts it does not shadow.
    pub fn full_text_search(&self, search: &str) -> ContextResult<Vec<FullTextSearchResult>> {
        if search.trim().is_empty() {
            return Ok(Vec::new());
        }
        let contexts = self.resolver.current_workspace_vocabulary_contexts()?;
        self.search_in(search, &contexts)
    }

    /// Terms matching `search` in the given vocabularies of the current workspace.
    ///
    /// An empty `vocabularies` set searches every vocabulary visible in the
    /// workspace. Vocabularies the workspace does not contain are ignored.
    pub fn full_text_search_of_terms(
        &self,
        search: &str,
        vocabularies: &BTreeSet<NamedNode>,
    ) -> ContextResult<Vec<FullTextSearchResult>> {
        if search.trim().is_empty() {
            return Ok(Vec::new());
        }
        let contexts = if vocabularies.is_empty() {
            self.resolver.current_workspace_vocabulary_contexts()?
        } else {
            let mut contexts = BTreeSet::new();
            for vocabulary in vocabularies {
                match self.resolver.resolve_vocabulary_context(vocabulary) {
                    Ok(context) => {
                        contexts.insert(context);
                    }
                    Err(ContextError::VocabularyNotFound { .. }) => {
                        tracing::debug!(%vocabulary, "vocabulary not in current workspace, skipping");
                    }
                    Err(e) => return Err(e),
                }
            }
            contexts
        };

        let mut results = self.search_in(search, &contexts)?;
        results.retain(|r| r.has_type(skos::CONCEPT));
        Ok(results)
    }

    /// An empty context set means nothing is visible; it never widens to the whole store.
    fn search_in(
        &self,
        search: &str,
        contexts: &BTreeSet<NamedNode>,
    ) -> ContextResult<Vec<FullTextSearchResult>> {
        if contexts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.dao.full_text_search(search, contexts)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use oxigraph::model::{Literal, Triple};

    use super::*;
    use crate::context::CanonicalCacheFilter;
    use crate::ontology::{dcterms, lx, rdf};
    use crate::store::GraphStore;
    use crate::workspace::{InMemoryWorkspaceProvider, VocabularyInfo, Workspace, WorkspaceMetadata};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    fn service() -> SearchService {
        let store = GraphStore::in_memory().unwrap();
        let mut tx = store.begin();
        for (ctx, voc, term) in [
            ("http://x/ws/ctx1", "http://x/voc1", "http://x/voc1/term/a"),
            ("http://x/ws/ctx2", "http://x/voc2", "http://x/voc2/term/a"),
            ("http://x/other/ctx3", "http://x/voc3", "http://x/voc3/term/a"),
        ] {
            let ctx = iri(ctx);
            tx.insert(&ctx, &Triple::new(iri(voc), rdf::TYPE, lx::VOCABULARY.into_owned()));
            tx.insert(&ctx, &Triple::new(iri(voc), dcterms::TITLE, Literal::new_simple_literal("Alpha vocabulary")));
            tx.insert(&ctx, &Triple::new(iri(term), rdf::TYPE, skos::CONCEPT.into_owned()));
            tx.insert(&ctx, &Triple::new(iri(term), skos::PREF_LABEL, Literal::new_simple_literal("Alpha")));
        }
        tx.commit().unwrap();
        let store = Arc::new(store);

        let provider = InMemoryWorkspaceProvider::new();
        provider.register(
            WorkspaceMetadata::new(Workspace::new(iri("http://x/ws")))
                .with_vocabulary(VocabularyInfo::new(iri("http://x/voc1"), iri("http://x/ws/ctx1")))
                .with_vocabulary(VocabularyInfo::new(iri("http://x/voc2"), iri("http://x/ws/ctx2"))),
        );
        provider.select(&iri("http://x/ws")).unwrap();
        let resolver = ContextResolver::new(
            Arc::new(provider),
            CanonicalCacheFilter::new(Arc::clone(&store), iri("http://x/canonical")),
        );
        SearchService::new(SearchDao::new(store, "en"), resolver)
    }

    #[test]
    fn search_sees_only_workspace_contexts() {
        let s = service();
        let results = s.full_text_search("alpha").unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.context.as_str().starts_with("http://x/ws/")));
    }

    #[test]
    fn term_search_filters_to_concepts() {
        let s = service();
        let results = s
            .full_text_search_of_terms("alpha", &BTreeSet::from([iri("http://x/voc1")]))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uri, iri("http://x/voc1/term/a"));
    }

    #[test]
    fn term_search_over_all_vocabularies() {
        let s = service();
        let results = s.full_text_search_of_terms("alpha", &BTreeSet::new()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.has_type(skos::CONCEPT)));
    }

    #[test]
    fn unknown_vocabularies_yield_nothing() {
        let s = service();
        let results = s
            .full_text_search_of_terms("alpha", &BTreeSet::from([iri("http://x/voc3")]))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn blank_search() {
        let s = service();
        assert!(s.full_text_search("").unwrap().is_empty());
        assert!(s.full_text_search_of_terms(" ", &BTreeSet::new()).unwrap().is_empty());
    }
}
