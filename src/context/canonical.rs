//! Canonical cache: shared, read-only baseline contexts and their shadowing.
//!
//! The container IRI `C` lists baseline contexts with `C lx:referencesContext ctx`.
//! A workspace shadows a baseline context once it references a working copy
//! whose `lx:isWorkingVersionOf` points at it.

use std::collections::BTreeSet;
use std::sync::Arc;

use oxigraph::model::NamedNode;

use crate::context::error::ContextResult;
use crate::ontology::lx;
use crate::store::{GraphStore, SparqlQuery, solution_iri};

/// Baseline contexts not shadowed by a workspace's working copies. Evaluated
/// as one query so the result reflects a single snapshot of the store.
const UNIQUE_CANONICAL_CONTEXTS_QUERY: &str = r#"
SELECT DISTINCT ?context WHERE {
    GRAPH ?containerGraph { ?container ?referencesContext ?context . }
    FILTER NOT EXISTS {
        GRAPH ?workspaceGraph { ?workspace ?referencesContext ?workingContext . }
        GRAPH ?versionGraph { ?workingContext ?isWorkingVersionOf ?context . }
    }
}
"#;

const CANONICAL_CONTEXTS_QUERY: &str = r#"
SELECT DISTINCT ?context WHERE {
    GRAPH ?containerGraph { ?container ?referencesContext ?context . }
}
"#;

/// Reads the canonical cache container.
#[derive(Debug, Clone)]
pub struct CanonicalCacheFilter {
    store: Arc<GraphStore>,
    container: NamedNode,
}

impl CanonicalCacheFilter {
    pub fn new(store: Arc<GraphStore>, container: NamedNode) -> Self {
        Self { store, container }
    }

    pub fn container(&self) -> &NamedNode {
        &self.container
    }

    /// Every context the container references.
    pub fn canonical_contexts(&self) -> ContextResult<BTreeSet<NamedNode>> {
        let query = SparqlQuery::new(CANONICAL_CONTEXTS_QUERY)
            .bind_iri("container", &self.container)
            .bind_iri("referencesContext", lx::REFERENCES_CONTEXT);
        self.collect_contexts(&query)
    }

    /// Canonical contexts for which `workspace` holds no working copy.
    pub fn find_unique_canonical_contexts(
        &self,
        workspace: &NamedNode,
    ) -> ContextResult<BTreeSet<NamedNode>> {
        let query = SparqlQuery::new(UNIQUE_CANONICAL_CONTEXTS_QUERY)
            .bind_iri("container", &self.container)
            .bind_iri("workspace", workspace)
            .bind_iri("referencesContext", lx::REFERENCES_CONTEXT)
            .bind_iri("isWorkingVersionOf", lx::IS_WORKING_VERSION_OF);
        let contexts = self.collect_contexts(&query)?;
        tracing::debug!(
            workspace = %workspace,
            count = contexts.len(),
            "resolved unique canonical contexts"
        );
        Ok(contexts)
    }

    fn collect_contexts(&self, query: &SparqlQuery) -> ContextResult<BTreeSet<NamedNode>> {
        Ok(self
            .store
            .select(&query.render())?
            .iter()
            .filter_map(|row| solution_iri(row, "context"))
            .collect())
    }
}
