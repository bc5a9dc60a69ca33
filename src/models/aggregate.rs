//! Defines the per-user aggregate record that caches the running balance.

use serde::{Deserialize, Serialize};

/// The per-user record holding the denormalized running balance and the
/// category configuration.
///
/// `current_balance` is a cache of the sum over both transaction logs since
/// account inception. It is intended to equal the true sum at any quiescent
/// point; transient divergence during concurrent writes is tolerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAggregate {
    /// Cached balance: sum of income amounts minus sum of spending amounts.
    pub current_balance: f64,
    /// Ordered category labels offered for income transactions.
    pub income_categories: Vec<String>,
    /// Ordered category labels offered for spending transactions.
    pub spending_categories: Vec<String>,
}

/// A partial update merged into a stored [UserAggregate].
///
/// Only the fields that are `Some` are written; every other field keeps its
/// stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateUpdate {
    /// Replacement for the cached balance.
    pub current_balance: Option<f64>,
    /// Replacement for the income category list.
    pub income_categories: Option<Vec<String>>,
    /// Replacement for the spending category list.
    pub spending_categories: Option<Vec<String>>,
}

impl AggregateUpdate {
    /// An update that only sets the cached balance.
    pub fn balance(value: f64) -> Self {
        Self {
            current_balance: Some(value),
            ..Self::default()
        }
    }

    /// An update that only sets the income category list.
    pub fn income_categories(categories: Vec<String>) -> Self {
        Self {
            income_categories: Some(categories),
            ..Self::default()
        }
    }

    /// An update that only sets the spending category list.
    pub fn spending_categories(categories: Vec<String>) -> Self {
        Self {
            spending_categories: Some(categories),
            ..Self::default()
        }
    }
}

impl From<UserAggregate> for AggregateUpdate {
    /// An update that sets every field, used when the record is first
    /// created.
    fn from(aggregate: UserAggregate) -> Self {
        Self {
            current_balance: Some(aggregate.current_balance),
            income_categories: Some(aggregate.income_categories),
            spending_categories: Some(aggregate.spending_categories),
        }
    }
}
