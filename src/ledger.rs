//! The balance reconciliation protocol and the operations built on it.

use time::{Date, OffsetDateTime};

use crate::{
    Error,
    config::LedgerConfig,
    live::{self, Subscription},
    models::{
        AggregateUpdate, NewTransaction, Transaction, TransactionForm, TransactionKind,
        UserAggregate, UserId,
    },
    stores::{AggregateStore, StoreError, TransactionQuery, TransactionStore},
    views::{self, DailyTotal},
};

/// The outcome of a fully reconciled add-transaction workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// The record as stored, with its assigned id.
    pub transaction: Transaction,
    /// The cached balance after the merge update.
    pub new_balance: f64,
}

/// The outcome of the delete-transaction workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Deletion {
    /// The user declined the confirmation prompt; nothing was written.
    Declined,
    /// The record was removed and the balance adjusted.
    Reconciled {
        /// The cached balance after the adjustment.
        new_balance: f64,
    },
}

/// The user's answer to the confirmation prompt shown before a transaction
/// is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Proceed with the deletion.
    Confirmed,
    /// Abort with no side effects.
    Declined,
}

/// The ledger consistency core: keeps the cached per-user balance in step
/// with the income and spending logs.
///
/// Store handles are injected here rather than imported as shared
/// singletons; one `Ledger` serves any number of users.
#[derive(Debug, Clone)]
pub struct Ledger<A, T> {
    aggregates: A,
    transactions: T,
    config: LedgerConfig,
}

impl<A, T> Ledger<A, T>
where
    A: AggregateStore,
    T: TransactionStore,
{
    /// Create a ledger over the given store handles.
    pub fn new(aggregates: A, transactions: T, config: LedgerConfig) -> Self {
        Self {
            aggregates,
            transactions,
            config,
        }
    }

    /// Record a new transaction and fold its amount into the cached
    /// balance.
    ///
    /// The log append and the balance update are two sequential writes, not
    /// one atomic transaction; either can fail independently.
    ///
    /// # Errors
    /// - [Error::CategoryRequired] if the form has an empty category.
    ///   Nothing is written.
    /// - [Error::TransactionLog] if the append fails. No balance change is
    ///   attempted.
    /// - [Error::BalanceNotReconciled] if the record was stored but the
    ///   balance update failed. The log and the cached balance disagree
    ///   until the caller corrects the balance.
    pub async fn add_transaction(
        &self,
        user: &UserId,
        kind: TransactionKind,
        form: TransactionForm,
    ) -> Result<Reconciled, Error> {
        if form.category.is_empty() {
            return Err(Error::CategoryRequired);
        }

        let record = NewTransaction {
            amount: form.amount,
            category: form.category,
            description: form.description,
            date: self.entry_timestamp(form.date, OffsetDateTime::now_utc()),
        };

        let transaction = self
            .transactions
            .append(user, kind, record)
            .await
            .map_err(Error::TransactionLog)?;

        tracing::debug!(
            "recorded {} transaction {} for {user}",
            kind.collection(),
            transaction.id
        );

        match self
            .apply_balance_delta(user, kind.signed(transaction.amount))
            .await
        {
            Ok(new_balance) => Ok(Reconciled {
                transaction,
                new_balance,
            }),
            Err(source) => Err(Error::BalanceNotReconciled {
                id: transaction.id,
                source,
            }),
        }
    }

    /// Remove a transaction and fold its amount back out of the cached
    /// balance, exactly inverting the corresponding insertion.
    ///
    /// # Errors
    /// - [Error::TransactionLog] if the remove fails. No balance change is
    ///   attempted.
    /// - [Error::BalanceNotReconciled] if the record was removed but the
    ///   balance adjustment failed.
    pub async fn delete_transaction(
        &self,
        user: &UserId,
        kind: TransactionKind,
        transaction: &Transaction,
        confirmation: Confirmation,
    ) -> Result<Deletion, Error> {
        if confirmation == Confirmation::Declined {
            return Ok(Deletion::Declined);
        }

        self.transactions
            .remove(user, kind, transaction.id)
            .await
            .map_err(Error::TransactionLog)?;

        tracing::debug!(
            "deleted {} transaction {} for {user}",
            kind.collection(),
            transaction.id
        );

        match self
            .apply_balance_delta(user, -kind.signed(transaction.amount))
            .await
        {
            Ok(new_balance) => Ok(Deletion::Reconciled { new_balance }),
            Err(source) => Err(Error::BalanceNotReconciled {
                id: transaction.id,
                source,
            }),
        }
    }

    /// Read the cached balance, apply `delta`, and write the result back.
    ///
    /// This is the protocol's single read-modify-write unit. Concurrent
    /// callers can interleave here and lose updates; a backend with an
    /// atomic increment or optimistic retry can replace this method without
    /// changing the add or delete contracts.
    async fn apply_balance_delta(&self, user: &UserId, delta: f64) -> Result<f64, StoreError> {
        let aggregate = self
            .aggregates
            .read(user)
            .await?
            .ok_or(StoreError::NotFound)?;

        let new_balance = aggregate.current_balance + delta;

        self.aggregates
            .merge_update(user, AggregateUpdate::balance(new_balance))
            .await?;

        Ok(new_balance)
    }

    /// Derive the stored timestamp for a transaction.
    ///
    /// A picked calendar date is combined with the current wall-clock time
    /// and shifted by [LedgerConfig::picked_date_offset]; no picked date
    /// means `now` is stored verbatim.
    fn entry_timestamp(&self, picked: Option<Date>, now: OffsetDateTime) -> OffsetDateTime {
        match picked {
            Some(date) => {
                date.with_time(now.time()).assume_offset(now.offset())
                    + self.config.picked_date_offset
            }
            None => now,
        }
    }

    /// Set up the aggregate record on first sign-in.
    ///
    /// Creates the record with a zero balance and the configured default
    /// category lists if the user has none, and returns the stored record
    /// otherwise. Safe to call on every sign-in.
    pub async fn ensure_aggregate(&self, user: &UserId) -> Result<UserAggregate, Error> {
        if let Some(aggregate) = self.aggregates.read(user).await.map_err(Error::Store)? {
            return Ok(aggregate);
        }

        let aggregate = UserAggregate {
            current_balance: 0.0,
            income_categories: self.config.default_income_categories.clone(),
            spending_categories: self.config.default_spending_categories.clone(),
        };

        self.aggregates
            .merge_update(user, AggregateUpdate::from(aggregate.clone()))
            .await
            .map_err(Error::Store)?;

        tracing::debug!("initialized the aggregate record for {user}");

        Ok(aggregate)
    }

    /// The cached balance for `user`.
    ///
    /// # Errors
    /// Returns [Error::NotLoaded] when the aggregate record has not been
    /// written yet. A missing record is not a zero balance.
    pub async fn balance(&self, user: &UserId) -> Result<f64, Error> {
        match self.aggregates.read(user).await.map_err(Error::Store)? {
            Some(aggregate) => Ok(aggregate.current_balance),
            None => Err(Error::NotLoaded),
        }
    }

    /// The category labels offered for `kind` transactions.
    ///
    /// The add-transaction form must stay gated until this returns
    /// successfully; [Error::NotLoaded] means the list has not arrived, not
    /// that it is empty.
    pub async fn categories(
        &self,
        user: &UserId,
        kind: TransactionKind,
    ) -> Result<Vec<String>, Error> {
        match self.aggregates.read(user).await.map_err(Error::Store)? {
            Some(aggregate) => Ok(match kind {
                TransactionKind::Income => aggregate.income_categories,
                TransactionKind::Spending => aggregate.spending_categories,
            }),
            None => Err(Error::NotLoaded),
        }
    }

    /// Replace the category labels offered for `kind` transactions.
    ///
    /// Only the list for `kind` is written; the other list and the balance
    /// keep their stored values.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] if any label is an empty string.
    pub async fn set_categories(
        &self,
        user: &UserId,
        kind: TransactionKind,
        categories: Vec<String>,
    ) -> Result<(), Error> {
        if categories.iter().any(|category| category.is_empty()) {
            return Err(Error::EmptyCategoryName);
        }

        let update = match kind {
            TransactionKind::Income => AggregateUpdate::income_categories(categories),
            TransactionKind::Spending => AggregateUpdate::spending_categories(categories),
        };

        self.aggregates
            .merge_update(user, update)
            .await
            .map_err(Error::Store)
    }

    /// Watch the most recent transactions in the `kind` log.
    ///
    /// Delivers the last [LedgerConfig::recent_limit] records, newest
    /// first, recomputed on every change to the log.
    pub fn watch_recent(
        &self,
        user: &UserId,
        kind: TransactionKind,
    ) -> Subscription<Vec<Transaction>> {
        let limit = self.config.recent_limit;

        live::watch(
            self.transactions.clone(),
            user.clone(),
            kind,
            move |_| TransactionQuery {
                limit: Some(limit),
                ..TransactionQuery::default()
            },
            |records, _| records,
        )
    }

    /// Watch the total amount recorded in the `kind` log this month.
    pub fn watch_monthly_total(&self, user: &UserId, kind: TransactionKind) -> Subscription<f64> {
        live::watch(
            self.transactions.clone(),
            user.clone(),
            kind,
            |today| TransactionQuery {
                after: Some(month_start_instant(today)),
                ..TransactionQuery::default()
            },
            |records, _| views::sum_amounts(&records),
        )
    }

    /// Watch the per-day totals of the `kind` log over the trailing
    /// [LedgerConfig::window_days] days.
    ///
    /// The standing query fetches records dated after the first day of the
    /// current month, so window days that reach into the previous month
    /// always sum to zero.
    pub fn watch_daily_series(
        &self,
        user: &UserId,
        kind: TransactionKind,
    ) -> Subscription<Vec<DailyTotal>> {
        let days = self.config.window_days;

        live::watch(
            self.transactions.clone(),
            user.clone(),
            kind,
            |today| TransactionQuery {
                after: Some(month_start_instant(today)),
                ..TransactionQuery::default()
            },
            move |records, today| views::daily_totals(&records, today, days),
        )
    }
}

/// The first instant of the month that `today` falls in, as a query bound.
fn month_start_instant(today: Date) -> OffsetDateTime {
    views::month_start(today).midnight().assume_utc()
}
