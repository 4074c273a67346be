//! SKOS thesaurus import.
//!
//! Reads one glossary (a `skos:ConceptScheme` with its concepts) from RDF
//! inputs and replaces an existing vocabulary's terms with it.

pub mod error;
pub mod identifier;
pub mod model;
pub mod skos;

pub use error::{ImportError, ImportResult};
pub use model::ImportModel;
pub use skos::{ImportOutcome, ImportPhase, SkosImporter, parse_media_type};
