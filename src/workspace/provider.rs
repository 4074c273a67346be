//! Workspace metadata providers: where resolvers get [`WorkspaceMetadata`] from.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use oxigraph::model::NamedNode;

use crate::context::error::{ContextError, ContextResult};
use crate::ontology::{lx, rdfs};
use crate::store::{GraphStore, SparqlQuery, solution_iri, solution_literal};

use super::{VocabularyInfo, Workspace, WorkspaceMetadata};

/// Source of workspace metadata for the context resolvers.
///
/// Implementations are shared between resolvers and must be safe to call from
/// several threads.
pub trait WorkspaceMetadataProvider: Send + Sync {
    /// The workspace the current session works in.
    fn current_workspace(&self) -> ContextResult<Workspace>;

    /// Metadata of a specific workspace.
    fn workspace_metadata(&self, workspace: &NamedNode) -> ContextResult<Arc<WorkspaceMetadata>>;

    /// Metadata of the current workspace.
    fn current_workspace_metadata(&self) -> ContextResult<Arc<WorkspaceMetadata>> {
        let workspace = self.current_workspace()?;
        self.workspace_metadata(&workspace.uri)
    }
}

/// Lists every (context, vocabulary) pair a workspace references, with the
/// canonical origin and change-tracking link of each context when present.
const WORKSPACE_CONTEXTS_QUERY: &str = r#"
SELECT ?context ?vocabulary ?canonical ?changeContext WHERE {
    GRAPH ?workspaceGraph { ?workspace ?referencesContext ?context . }
    GRAPH ?context { ?vocabulary a ?vocabularyType . }
    OPTIONAL { GRAPH ?context { ?context ?hasChangeTrackingContext ?changeContext . } }
    OPTIONAL { GRAPH ?versionGraph { ?context ?isWorkingVersionOf ?canonical . } }
}
"#;

const WORKSPACE_LABEL_QUERY: &str = r#"
SELECT ?label WHERE {
    GRAPH ?workspaceGraph { ?workspace ?label_predicate ?label . }
}
"#;

const WORKSPACE_EXISTS_QUERY: &str = r#"
ASK { GRAPH ?workspaceGraph { ?workspace ?p ?o . } }
"#;

/// Registry of workspace metadata held in memory, with one selected workspace.
pub struct InMemoryWorkspaceProvider {
    workspaces: RwLock<HashMap<NamedNode, Arc<WorkspaceMetadata>>>,
    current: RwLock<Option<NamedNode>>,
}

impl std::fmt::Debug for InMemoryWorkspaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.workspaces.read().map(|w| w.len()).unwrap_or(0);
        let current = self.current.read().ok().and_then(|c| c.clone());
        f.debug_struct("InMemoryWorkspaceProvider")
            .field("workspace_count", &count)
            .field("current", &current)
            .finish()
    }
}

impl Default for InMemoryWorkspaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWorkspaceProvider {
    pub fn new() -> Self {
        Self {
            workspaces: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
        }
    }

    /// Register (or replace) the metadata of a workspace.
    pub fn register(&self, metadata: WorkspaceMetadata) -> Arc<WorkspaceMetadata> {
        let metadata = Arc::new(metadata);
        let uri = metadata.workspace().uri.clone();
        tracing::debug!(workspace = %uri, vocabularies = metadata.len(), "registered workspace");
        self.workspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri, Arc::clone(&metadata));
        metadata
    }

    /// Make a registered workspace the current one.
    pub fn select(&self, workspace: &NamedNode) -> ContextResult<()> {
        if !self
            .workspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(workspace)
        {
            return Err(ContextError::WorkspaceNotFound {
                workspace: workspace.as_str().into(),
            });
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(workspace.clone());
        tracing::info!(workspace = %workspace, "selected workspace");
        Ok(())
    }

    /// Build a workspace's metadata from the statements in `store` and register it.
    ///
    /// The workspace references its working contexts with `lx:referencesContext`;
    /// each context holds one `lx:Vocabulary`, may link its change-tracking
    /// context and may be declared a working version of a canonical context.
    pub fn load_from_store(
        &self,
        store: &GraphStore,
        workspace: &NamedNode,
    ) -> ContextResult<Arc<WorkspaceMetadata>> {
        let exists = SparqlQuery::new(WORKSPACE_EXISTS_QUERY).bind_iri("workspace", workspace);
        if !store.ask(&exists.render())? {
            return Err(ContextError::WorkspaceNotFound {
                workspace: workspace.as_str().into(),
            });
        }

        let label_query = SparqlQuery::new(WORKSPACE_LABEL_QUERY)
            .bind_iri("workspace", workspace)
            .bind_iri("label_predicate", rdfs::LABEL);
        let label = store
            .select(&label_query.render())?
            .iter()
            .find_map(|row| solution_literal(row, "label"))
            .map(|l| l.value().to_string());

        let mut ws = Workspace::new(workspace.clone());
        ws.label = label;
        let mut metadata = WorkspaceMetadata::new(ws);

        let query = SparqlQuery::new(WORKSPACE_CONTEXTS_QUERY)
            .bind_iri("workspace", workspace)
            .bind_iri("referencesContext", lx::REFERENCES_CONTEXT)
            .bind_iri("vocabularyType", lx::VOCABULARY)
            .bind_iri("hasChangeTrackingContext", lx::HAS_CHANGE_TRACKING_CONTEXT)
            .bind_iri("isWorkingVersionOf", lx::IS_WORKING_VERSION_OF);

        for row in store.select(&query.render())? {
            let (Some(context), Some(vocabulary)) =
                (solution_iri(&row, "context"), solution_iri(&row, "vocabulary"))
            else {
                continue;
            };
            if metadata
                .vocabulary_info(&vocabulary)
                .is_ok_and(|existing| existing.context == context)
            {
                // Extra rows come from multiple optional matches; the first wins.
                continue;
            }
            let mut info = VocabularyInfo::new(vocabulary, context);
            info.canonical_context = solution_iri(&row, "canonical");
            info.change_tracking_context = solution_iri(&row, "changeContext");
            metadata.add_vocabulary(info);
        }

        Ok(self.register(metadata))
    }
}

impl WorkspaceMetadataProvider for InMemoryWorkspaceProvider {
    fn current_workspace(&self) -> ContextResult<Workspace> {
        let current = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ContextError::NoCurrentWorkspace)?;
        Ok(self.workspace_metadata(&current)?.workspace().clone())
    }

    fn workspace_metadata(&self, workspace: &NamedNode) -> ContextResult<Arc<WorkspaceMetadata>> {
        self.workspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(workspace)
            .cloned()
            .ok_or_else(|| ContextError::WorkspaceNotFound {
                workspace: workspace.as_str().into(),
            })
    }
}
