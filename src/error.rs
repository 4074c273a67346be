//! Rich diagnostic error types for lexigraph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! so callers get an error code and help text along with the message. The
//! top-level [`LexError`] wraps them without losing the diagnostic chain.

use miette::Diagnostic;
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::context::error::{ContextError, ContextResult};
pub use crate::import::error::{ImportError, ImportResult};

/// Top-level error type for lexigraph.
#[derive(Debug, Error, Diagnostic)]
pub enum LexError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to open graph store at {path}: {message}")]
    #[diagnostic(
        code(lexigraph::store::open),
        help(
            "The oxigraph store could not be created or opened. Check that the \
             data directory exists, is writable, and is not locked by another process."
        )
    )]
    Open { path: String, message: String },

    #[error("SPARQL query failed: {message}")]
    #[diagnostic(
        code(lexigraph::store::query),
        help(
            "The query was rejected or failed during evaluation. Check the query \
             syntax and that every template parameter was bound."
        )
    )]
    Query { message: String },

    #[error("SPARQL update failed, no changes were applied: {message}")]
    #[diagnostic(
        code(lexigraph::store::update),
        help(
            "The write transaction was aborted as a whole. Nothing from it is \
             visible in the store; the operation can be repeated once the cause is fixed."
        )
    )]
    Update { message: String },

    #[error("failed to load dataset: {message}")]
    #[diagnostic(
        code(lexigraph::store::load),
        help(
            "Check that the file is well-formed and matches its format. Use a dataset \
             format (TriG, N-Quads) to place statements into named graphs."
        )
    )]
    Load { message: String },

    #[error("unexpected query result shape: {message}")]
    #[diagnostic(
        code(lexigraph::store::result_shape),
        help("SELECT queries must be run through `select`, ASK queries through `ask`.")
    )]
    ResultShape { message: String },

    #[error("invalid IRI \"{iri}\": {message}")]
    #[diagnostic(
        code(lexigraph::store::invalid_iri),
        help("Identifiers must be absolute IRIs, e.g. `http://example.org/vocabulary/1`.")
    )]
    InvalidIri { iri: String, message: String },
}

/// Result type for graph store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience alias for functions returning lexigraph results.
pub type LexResult<T> = std::result::Result<T, LexError>;
