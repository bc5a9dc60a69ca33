//! Defines the transaction log store trait.

use std::future::Future;

use time::OffsetDateTime;
use tokio::sync::broadcast;

use crate::models::{NewTransaction, Transaction, TransactionId, TransactionKind, UserId};

use super::StoreError;

/// Handles the two append-only transaction logs kept for each user.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Append `record` to the `kind` log for `user`.
    ///
    /// The store assigns the id and returns the stored record.
    ///
    /// # Errors
    /// Returns a [StoreError] when the write is rejected. The record was not
    /// stored in that case; append never fails silently.
    fn append(
        &self,
        user: &UserId,
        kind: TransactionKind,
        record: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send;

    /// Delete the record with `id` from the `kind` log for `user`.
    ///
    /// Removing an id that is not in the log is not an error.
    fn remove(
        &self,
        user: &UserId,
        kind: TransactionKind,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Retrieve records from the `kind` log for `user` as described by
    /// `query`.
    fn range_query(
        &self,
        user: &UserId,
        kind: TransactionKind,
        query: TransactionQuery,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Subscribe to change notifications for every log held by the store.
    ///
    /// One [Change] is published for each append or remove. Receivers
    /// filter for the user and kind they care about.
    fn changes(&self) -> broadcast::Receiver<Change>;
}

/// A change notification published after a log mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// The user whose log changed.
    pub user: UserId,
    /// Which of the user's logs changed.
    pub kind: TransactionKind,
}

/// Defines how transactions are fetched from
/// [TransactionStore::range_query].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include records dated strictly after this point in time.
    pub after: Option<OffsetDateTime>,
    /// Return up to the first N records after sorting.
    pub limit: Option<usize>,
    /// The order to sort records by date. Records with equal dates are
    /// returned in the store's natural order, which is
    /// implementation-defined.
    pub order: SortOrder,
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing date.
    Ascending,
    /// Sort in order of decreasing date.
    #[default]
    Descending,
}
