//! Context-resolution error types with rich diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use crate::error::StoreError;

/// Errors arising while mapping workspaces, vocabularies and assets to contexts.
#[derive(Debug, Error, Diagnostic)]
pub enum ContextError {
    #[error("no current workspace is selected")]
    #[diagnostic(
        code(lexigraph::context::no_current_workspace),
        help(
            "Select a workspace on the metadata provider before resolving contexts \
             for the current workspace, or use the variants taking an explicit workspace."
        )
    )]
    NoCurrentWorkspace,

    #[error("workspace not found: {workspace}")]
    #[diagnostic(
        code(lexigraph::context::workspace_not_found),
        help(
            "No metadata is registered for this workspace. Load it from the store \
             or register it with the metadata provider first."
        )
    )]
    WorkspaceNotFound { workspace: String },

    #[error("vocabulary {vocabulary} has no context in workspace {workspace}")]
    #[diagnostic(
        code(lexigraph::context::vocabulary_not_found),
        help(
            "The workspace metadata does not list this vocabulary. Check the \
             vocabulary IRI, or add the vocabulary's working context to the workspace."
        )
    )]
    VocabularyNotFound { vocabulary: String, workspace: String },

    #[error("inconsistent repository state for {subject}: {message}")]
    #[diagnostic(
        code(lexigraph::context::consistency_violation),
        help(
            "The store contains data this operation cannot disambiguate. It is not \
             retried; inspect the statements about the reported resource and repair them."
        )
    )]
    ConsistencyViolation { subject: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

/// Result type for context-resolution operations.
pub type ContextResult<T> = Result<T, ContextError>;
