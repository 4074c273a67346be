//! Thesaurus import error types with rich diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use crate::context::error::ContextError;
use crate::error::StoreError;

/// Errors from importing a SKOS thesaurus into a vocabulary.
#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("unsupported import media type: {media_type}")]
    #[diagnostic(
        code(lexigraph::import::unsupported_media_type),
        help(
            "Supported media types: text/turtle, application/rdf+xml, application/n-triples, \
             application/n-quads, application/trig, text/n3."
        )
    )]
    UnsupportedMediaType { media_type: String },

    #[error("invalid import input: {message}")]
    #[diagnostic(
        code(lexigraph::import::invalid_input),
        help(
            "An import needs at least one input, and the inputs together must declare \
             exactly one skos:ConceptScheme identified by an IRI. An importer session \
             runs only once; create a new one for the next import."
        )
    )]
    InvalidInput { message: String },

    #[error("failed to parse import data: {message}")]
    #[diagnostic(
        code(lexigraph::import::parse),
        help("Check that the input is well-formed and matches the declared media type.")
    )]
    Parse { message: String },

    #[error("vocabulary {vocabulary} not found in context {context}")]
    #[diagnostic(
        code(lexigraph::import::vocabulary_not_found),
        help("Create the vocabulary in its working context before importing a glossary into it.")
    )]
    VocabularyNotFound { vocabulary: String, context: String },

    #[error("import commit failed, the store was left unchanged")]
    #[diagnostic(
        code(lexigraph::import::commit),
        help("The transaction was rolled back as a whole. Fix the cause and run the import again.")
    )]
    Commit {
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
