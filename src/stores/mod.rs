//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

pub use aggregate::AggregateStore;
pub use memory::MemoryStore;
pub use transaction::{Change, SortOrder, TransactionQuery, TransactionStore};

mod aggregate;
mod memory;
mod transaction;

/// Errors surfaced by a backing document store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("the requested record could not be found")]
    NotFound,

    /// The store rejected the request.
    #[error("the store rejected the request: {0}")]
    Backend(String),

    /// The store could not be reached.
    #[error("the store is unavailable: {0}")]
    Unavailable(String),
}
