//! Easy Budget is a personal budgeting application backed by a cloud
//! document database.
//!
//! This library implements the app's ledger consistency core: a cached
//! per-user balance kept in step with two append-only transaction logs
//! (income and spending), live queries that recompute derived views on
//! every change to a log, and the add/delete reconciliation workflows that
//! update a log and the balance as two sequential writes.
//!
//! The document database and the identity provider are external
//! collaborators. Implement [stores::AggregateStore] and
//! [stores::TransactionStore] over the real backend and inject the handles
//! into [Ledger]; [stores::MemoryStore] is the reference implementation
//! used by the tests and the demo binary.

#![warn(missing_docs)]

pub mod config;
pub mod models;
pub mod stores;
pub mod views;

mod ledger;
mod live;

pub use config::LedgerConfig;
pub use ledger::{Confirmation, Deletion, Ledger, Reconciled};
pub use live::Subscription;

use crate::{models::TransactionId, stores::StoreError};

/// The errors that may occur in the ledger core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The add-transaction form was submitted without a category.
    ///
    /// Validation failures block the operation before anything is written.
    #[error("a category must be selected before the transaction can be recorded")]
    CategoryRequired,

    /// An empty string was used as a category label.
    #[error("category names cannot be empty")]
    EmptyCategoryName,

    /// The transaction log rejected an append or remove.
    ///
    /// The log is unchanged and no balance update was attempted. The caller
    /// decides whether to re-attempt; nothing is retried automatically.
    #[error("the transaction log could not be updated: {0}")]
    TransactionLog(StoreError),

    /// The transaction log was updated but the balance update failed.
    ///
    /// This is the partial outcome of the non-atomic reconciliation
    /// protocol: the record with the given id is in (or gone from) the log
    /// while the cached balance is stale. Callers must not treat this as
    /// full success; the balance needs eventual correction.
    #[error("transaction {id} was written to the log but the balance update failed: {source}")]
    BalanceNotReconciled {
        /// The id of the log record the balance now disagrees with.
        id: TransactionId,
        /// The store failure that interrupted the balance update.
        source: StoreError,
    },

    /// A read dependency has not arrived yet.
    ///
    /// Distinct from "empty": the user's aggregate record has never been
    /// written, so the balance and the category lists are unknown, not
    /// zero. Dependent workflow steps, such as rendering the
    /// add-transaction form, must stay gated until this clears.
    #[error("the user's budget record has not loaded yet")]
    NotLoaded,

    /// The document store failed during a read.
    #[error("the document store returned an error: {0}")]
    Store(StoreError),
}
