//! This module defines the domain data types.

pub use aggregate::{AggregateUpdate, UserAggregate};
pub use transaction::{
    NewTransaction, Transaction, TransactionForm, TransactionId, TransactionKind,
};
pub use user::{User, UserId};

mod aggregate;
mod transaction;
mod user;
