//! Workspaces and the vocabulary-to-context mapping they carry.
//!
//! A workspace gives a session its own working contexts for a subset of
//! vocabularies. [`WorkspaceMetadata`] is the materialized view of one
//! workspace; a [`WorkspaceMetadataProvider`] hands it out.

pub mod provider;

use std::collections::{BTreeSet, HashMap};

use oxigraph::model::NamedNode;

use crate::context::error::{ContextError, ContextResult};

pub use provider::{InMemoryWorkspaceProvider, WorkspaceMetadataProvider};

/// An isolation boundary identified by an IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Workspace {
    pub uri: NamedNode,
    pub label: Option<String>,
}

impl Workspace {
    pub fn new(uri: NamedNode) -> Self {
        Self { uri, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Where one vocabulary lives inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyInfo {
    /// Vocabulary IRI.
    pub uri: NamedNode,
    /// Working context holding the workspace's copy of the vocabulary.
    pub context: NamedNode,
    /// Canonical context the working copy was derived from, if any.
    pub canonical_context: Option<NamedNode>,
    /// Registered change-tracking context, if one has been linked.
    pub change_tracking_context: Option<NamedNode>,
}

impl VocabularyInfo {
    pub fn new(uri: NamedNode, context: NamedNode) -> Self {
        Self {
            uri,
            context,
            canonical_context: None,
            change_tracking_context: None,
        }
    }

    pub fn with_canonical_context(mut self, context: NamedNode) -> Self {
        self.canonical_context = Some(context);
        self
    }

    pub fn with_change_tracking_context(mut self, context: NamedNode) -> Self {
        self.change_tracking_context = Some(context);
        self
    }
}

/// Materialized metadata of one workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceMetadata {
    workspace: Workspace,
    vocabularies: HashMap<NamedNode, VocabularyInfo>,
}

impl WorkspaceMetadata {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            vocabularies: HashMap::new(),
        }
    }

    /// Builder form of [`add_vocabulary`](Self::add_vocabulary).
    pub fn with_vocabulary(mut self, info: VocabularyInfo) -> Self {
        self.add_vocabulary(info);
        self
    }

    /// Register a vocabulary. A vocabulary maps to one working context, so a
    /// second registration replaces the first and the old entry is returned.
    pub fn add_vocabulary(&mut self, info: VocabularyInfo) -> Option<VocabularyInfo> {
        let previous = self.vocabularies.insert(info.uri.clone(), info);
        if let Some(ref old) = previous {
            tracing::warn!(
                workspace = %self.workspace.uri,
                vocabulary = %old.uri,
                replaced_context = %old.context,
                "vocabulary re-registered with a different working context"
            );
        }
        previous
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Info about `vocabulary`, or `VocabularyNotFound`.
    pub fn vocabulary_info(&self, vocabulary: &NamedNode) -> ContextResult<&VocabularyInfo> {
        self.vocabularies
            .get(vocabulary)
            .ok_or_else(|| ContextError::VocabularyNotFound {
                vocabulary: vocabulary.as_str().into(),
                workspace: self.workspace.uri.as_str().into(),
            })
    }

    /// Working contexts of all vocabularies in the workspace.
    pub fn vocabulary_contexts(&self) -> BTreeSet<NamedNode> {
        self.vocabularies.values().map(|v| v.context.clone()).collect()
    }

    /// Registered change-tracking contexts of all vocabularies in the workspace.
    pub fn change_tracking_contexts(&self) -> BTreeSet<NamedNode> {
        self.vocabularies
            .values()
            .filter_map(|v| v.change_tracking_context.clone())
            .collect()
    }

    pub fn vocabularies(&self) -> impl Iterator<Item = &VocabularyInfo> {
        self.vocabularies.values()
    }

    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty()
    }
}
