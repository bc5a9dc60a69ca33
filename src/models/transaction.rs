//! Defines the transaction record, the core type of the budgeting ledger.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Alias for the integer type used for store-generated transaction ids.
pub type TransactionId = i64;

/// The two transaction logs a record can belong to.
///
/// A record lives in exactly one log. The sign of its effect on the balance
/// is implied by the log, not stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money earned. Recording a transaction increases the balance.
    Income,
    /// Money spent. Recording a transaction decreases the balance.
    Spending,
}

impl TransactionKind {
    /// The name of the per-user collection that stores this kind of record.
    pub fn collection(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Spending => "spending",
        }
    }

    /// The effect of `amount` on the running balance for this kind.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Spending => -amount,
        }
    }
}

/// An income or spending event recorded in one of the per-user logs.
///
/// Once written a record is never mutated, only created or deleted whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The store-generated id, stable for the record's lifetime.
    pub id: TransactionId,
    /// The amount of money earned or spent. Always positive; the sign is
    /// implied by the log the record lives in.
    pub amount: f64,
    /// The user-chosen category label for the record.
    pub category: String,
    /// Free-text description. An empty string means "no description".
    pub description: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

/// A finalized record ready to be appended to a log, before the store has
/// assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money earned or spent.
    pub amount: f64,
    /// The user-chosen category label.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

/// The values submitted by the add-transaction form.
///
/// The reconciliation protocol validates the category and derives the full
/// stored timestamp from `date` before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    /// The amount entered by the user. Accepted as entered; only the
    /// category is validated.
    pub amount: f64,
    /// The selected category. Must be non-empty.
    pub category: String,
    /// Optional description. Defaults to the empty string.
    pub description: String,
    /// The calendar date picked by the user, or `None` to record the
    /// current time verbatim.
    pub date: Option<Date>,
}

impl TransactionForm {
    /// Create a form with the given amount and category, an empty
    /// description, and no picked date.
    pub fn new(amount: f64, category: &str) -> Self {
        Self {
            amount,
            category: category.to_owned(),
            description: String::new(),
            date: None,
        }
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the calendar date picked by the user.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }
}
