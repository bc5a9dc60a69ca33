//! Implements an in-memory document store backing both store traits.

use std::{
    collections::HashMap,
    future::{Future, ready},
    sync::{Arc, Mutex},
};

use tokio::sync::broadcast;

use crate::models::{
    AggregateUpdate, NewTransaction, Transaction, TransactionId, TransactionKind, UserAggregate,
    UserId,
};

use super::{AggregateStore, Change, SortOrder, StoreError, TransactionQuery, TransactionStore};

/// How many change notifications may be buffered per receiver before old
/// ones are dropped. Subscribers recompute from scratch on every
/// notification, so a lagged receiver loses nothing.
const CHANGE_BUFFER: usize = 64;

/// Stores user documents in memory.
///
/// Stands in for the external document database in tests and the demo
/// binary: one aggregate record per user plus the two per-user transaction
/// logs, with a broadcast feed as the subscribe-for-changes primitive.
/// Clones share the same underlying documents.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    documents: Arc<Mutex<Documents>>,
    changes: broadcast::Sender<Change>,
}

#[derive(Debug, Default)]
struct Documents {
    users: HashMap<UserId, UserDocument>,
    next_id: TransactionId,
}

#[derive(Debug, Default)]
struct UserDocument {
    aggregate: Option<UserAggregate>,
    income: Vec<Transaction>,
    spending: Vec<Transaction>,
}

impl UserDocument {
    fn log(&self, kind: TransactionKind) -> &Vec<Transaction> {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Spending => &self.spending,
        }
    }

    fn log_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Spending => &mut self.spending,
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);

        Self {
            documents: Arc::new(Mutex::new(Documents::default())),
            changes,
        }
    }

    fn publish(&self, user: &UserId, kind: TransactionKind) {
        // Nobody listening is fine; views subscribe lazily.
        let _ = self.changes.send(Change {
            user: user.clone(),
            kind,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateStore for MemoryStore {
    fn read(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Option<UserAggregate>, StoreError>> + Send {
        let aggregate = self
            .documents
            .lock()
            .unwrap()
            .users
            .get(user)
            .and_then(|document| document.aggregate.clone());

        ready(Ok(aggregate))
    }

    fn merge_update(
        &self,
        user: &UserId,
        update: AggregateUpdate,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let mut documents = self.documents.lock().unwrap();
        let document = documents.users.entry(user.clone()).or_default();
        let aggregate = document.aggregate.get_or_insert_with(UserAggregate::default);

        if let Some(balance) = update.current_balance {
            aggregate.current_balance = balance;
        }
        if let Some(categories) = update.income_categories {
            aggregate.income_categories = categories;
        }
        if let Some(categories) = update.spending_categories {
            aggregate.spending_categories = categories;
        }

        ready(Ok(()))
    }
}

impl TransactionStore for MemoryStore {
    fn append(
        &self,
        user: &UserId,
        kind: TransactionKind,
        record: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send {
        let transaction = {
            let mut documents = self.documents.lock().unwrap();
            documents.next_id += 1;

            let transaction = Transaction {
                id: documents.next_id,
                amount: record.amount,
                category: record.category,
                description: record.description,
                date: record.date,
            };

            documents
                .users
                .entry(user.clone())
                .or_default()
                .log_mut(kind)
                .push(transaction.clone());

            transaction
        };

        self.publish(user, kind);

        ready(Ok(transaction))
    }

    fn remove(
        &self,
        user: &UserId,
        kind: TransactionKind,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let removed = {
            let mut documents = self.documents.lock().unwrap();

            match documents.users.get_mut(user) {
                Some(document) => {
                    let log = document.log_mut(kind);
                    let before = log.len();
                    log.retain(|transaction| transaction.id != id);
                    log.len() != before
                }
                None => false,
            }
        };

        if removed {
            self.publish(user, kind);
        }

        ready(Ok(()))
    }

    fn range_query(
        &self,
        user: &UserId,
        kind: TransactionKind,
        query: TransactionQuery,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send {
        let mut records: Vec<Transaction> = {
            let documents = self.documents.lock().unwrap();

            match documents.users.get(user) {
                Some(document) => document
                    .log(kind)
                    .iter()
                    .filter(|transaction| {
                        query.after.map_or(true, |after| transaction.date > after)
                    })
                    .cloned()
                    .collect(),
                None => Vec::new(),
            }
        };

        // Stable sort keeps records with equal dates in insertion order.
        match query.order {
            SortOrder::Ascending => records.sort_by(|a, b| a.date.cmp(&b.date)),
            SortOrder::Descending => records.sort_by(|a, b| b.date.cmp(&a.date)),
        }

        if let Some(limit) = query.limit {
            records.truncate(limit);
        }

        ready(Ok(records))
    }

    fn changes(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }
}
