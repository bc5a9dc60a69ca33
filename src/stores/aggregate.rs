//! Defines the aggregate store trait.

use std::future::Future;

use crate::models::{AggregateUpdate, UserAggregate, UserId};

use super::StoreError;

/// Handles the per-user record holding the cached balance and the category
/// configuration.
pub trait AggregateStore: Clone + Send + Sync + 'static {
    /// Retrieve the aggregate record for `user`.
    ///
    /// Returns `Ok(None)` when no record has been written yet. Callers must
    /// treat this as "not loaded", not as a zero balance or empty category
    /// lists.
    fn read(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Option<UserAggregate>, StoreError>> + Send;

    /// Merge `update` into the record for `user`.
    ///
    /// Fields absent from `update` keep their stored values. The record is
    /// created if it does not exist. The last writer wins; no concurrency
    /// token is used.
    fn merge_update(
        &self,
        user: &UserId,
        update: AggregateUpdate,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
