//! Maps vocabularies to the contexts that hold them in a workspace.

use std::collections::BTreeSet;
use std::sync::Arc;

use oxigraph::model::NamedNode;

use crate::context::canonical::CanonicalCacheFilter;
use crate::context::error::ContextResult;
use crate::workspace::{Workspace, WorkspaceMetadataProvider};

/// Read-only resolver of vocabulary contexts.
///
/// Cheap to clone; clones share the provider and the store.
#[derive(Clone)]
pub struct ContextResolver {
    provider: Arc<dyn WorkspaceMetadataProvider>,
    canonical: CanonicalCacheFilter,
}

impl std::fmt::Debug for ContextResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextResolver")
            .field("canonical_container", self.canonical.container())
            .finish()
    }
}

impl ContextResolver {
    pub fn new(provider: Arc<dyn WorkspaceMetadataProvider>, canonical: CanonicalCacheFilter) -> Self {
        Self { provider, canonical }
    }

    pub fn canonical(&self) -> &CanonicalCacheFilter {
        &self.canonical
    }

    pub fn current_workspace(&self) -> ContextResult<Workspace> {
        self.provider.current_workspace()
    }

    /// Context of `vocabulary` in the current workspace.
    pub fn resolve_vocabulary_context(&self, vocabulary: &NamedNode) -> ContextResult<NamedNode> {
        let workspace = self.provider.current_workspace()?;
        self.resolve_vocabulary_context_in(&workspace.uri, vocabulary)
    }

    /// Context of `vocabulary` in `workspace`.
    pub fn resolve_vocabulary_context_in(
        &self,
        workspace: &NamedNode,
        vocabulary: &NamedNode,
    ) -> ContextResult<NamedNode> {
        let metadata = self.provider.workspace_metadata(workspace)?;
        let context = metadata.vocabulary_info(vocabulary)?.context.clone();
        tracing::trace!(%workspace, %vocabulary, %context, "resolved vocabulary context");
        Ok(context)
    }

    /// Every context visible in `workspace`: its working contexts plus the
    /// canonical contexts it does not shadow.
    pub fn workspace_vocabulary_contexts(
        &self,
        workspace: &NamedNode,
    ) -> ContextResult<BTreeSet<NamedNode>> {
        let metadata = self.provider.workspace_metadata(workspace)?;
        let mut contexts = metadata.vocabulary_contexts();
        contexts.extend(self.canonical.find_unique_canonical_contexts(workspace)?);
        Ok(contexts)
    }

    pub fn current_workspace_vocabulary_contexts(&self) -> ContextResult<BTreeSet<NamedNode>> {
        let workspace = self.provider.current_workspace()?;
        self.workspace_vocabulary_contexts(&workspace.uri)
    }

    /// Change-tracking contexts registered for the vocabularies of `workspace`.
    pub fn change_tracking_contexts(
        &self,
        workspace: &NamedNode,
    ) -> ContextResult<BTreeSet<NamedNode>> {
        Ok(self
            .provider
            .workspace_metadata(workspace)?
            .change_tracking_contexts())
    }

    pub fn current_workspace_change_tracking_contexts(&self) -> ContextResult<BTreeSet<NamedNode>> {
        Ok(self.provider.current_workspace_metadata()?.change_tracking_contexts())
    }
}
