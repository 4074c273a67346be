//! Persistence of vocabularies and terms.
//!
//! DAOs read through [`GraphStore::select`](crate::store::GraphStore::select) and
//! never write directly: mutations are staged on a caller-owned
//! [`StoreTransaction`](crate::store::StoreTransaction) so several of them
//! commit together.

pub mod term;
pub mod vocabulary;

pub use term::TermDao;
pub use vocabulary::VocabularyDao;
