//! Context resolution: which named graph holds what.
//!
//! - [`ContextResolver`]: vocabulary to working context, plus the aggregate
//!   context set visible in a workspace.
//! - [`CanonicalCacheFilter`]: shared baseline contexts a workspace has not shadowed.
//! - [`ChangeTrackingContextResolver`]: the graph receiving an asset's audit records.

pub mod canonical;
pub mod change_tracking;
pub mod error;
pub mod resolver;

pub use canonical::CanonicalCacheFilter;
pub use change_tracking::ChangeTrackingContextResolver;
pub use error::{ContextError, ContextResult};
pub use resolver::ContextResolver;
