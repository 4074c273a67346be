// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # lexigraph
//!
//! A thesaurus repository over RDF named graphs: vocabularies live in
//! per-workspace working contexts, shared canonical contexts are shadowed by
//! working copies, and SKOS glossaries are imported into vocabularies in one
//! atomic update.
//!
//! ## Architecture
//!
//! - **Store** (`store`): oxigraph quad store with SPARQL templates and staged transactions
//! - **Workspaces** (`workspace`): vocabulary-to-context mappings per workspace
//! - **Contexts** (`context`): working, canonical and change-tracking context resolution
//! - **Import** (`import`): SKOS glossary import with namespace checks
//! - **Search** (`search`): workspace-scoped full-text search with ranking and snippets
//!
//! ## Library usage
//!
//! ```no_run
//! use lexigraph::config::LexConfig;
//! use lexigraph::engine::Engine;
//! use oxigraph::model::NamedNode;
//!
//! let engine = Engine::new(LexConfig::default()).unwrap();
//! engine.open_workspace(&NamedNode::new("http://example.org/ws").unwrap()).unwrap();
//! let hits = engine.search().full_text_search("building").unwrap();
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod ontology;
pub mod repository;
pub mod search;
pub mod store;
pub mod workspace;
