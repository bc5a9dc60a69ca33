//! Live query subscriptions over the transaction logs.

use time::{Date, OffsetDateTime};
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};

use crate::{
    models::{Transaction, TransactionKind, UserId},
    stores::{TransactionQuery, TransactionStore},
};

/// A standing query whose result is recomputed and delivered on every
/// change to the watched log.
///
/// The first value delivered by [Subscription::next] is the initial result;
/// each one after it is the complete recomputed result, not a diff, for one
/// change notification. Dropping the subscription releases the underlying
/// change listener.
#[derive(Debug)]
pub struct Subscription<T> {
    results: mpsc::UnboundedReceiver<T>,
    task: JoinHandle<()>,
}

impl<T> Subscription<T> {
    /// Wait for the next result.
    ///
    /// Returns `None` once the subscription has been cancelled and all
    /// previously computed results have been consumed or discarded.
    pub async fn next(&mut self) -> Option<T> {
        self.results.recv().await
    }

    /// Stop delivery and release the underlying change listener.
    ///
    /// Results computed but not yet consumed are discarded. In-flight store
    /// writes are unaffected; only their result delivery stops.
    pub fn cancel(&mut self) {
        self.task.abort();
        self.results.close();
        while self.results.try_recv().is_ok() {}
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a standing query over one (user, kind) log.
///
/// `query` builds the store query for a given "today" and `fold` reduces
/// the fetched records to the view value; both run again in full on every
/// change notification for the watched log.
pub(crate) fn watch<S, T, Q, F>(
    store: S,
    user: UserId,
    kind: TransactionKind,
    query: Q,
    fold: F,
) -> Subscription<T>
where
    S: TransactionStore,
    T: Send + 'static,
    Q: Fn(Date) -> TransactionQuery + Send + Sync + 'static,
    F: Fn(Vec<Transaction>, Date) -> T + Send + Sync + 'static,
{
    let (sender, results) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        // Listen before the initial fetch so no change falls in between.
        let mut changes = store.changes();

        if deliver(&store, &user, kind, &query, &fold, &sender)
            .await
            .is_err()
        {
            return;
        }

        loop {
            match changes.recv().await {
                Ok(change) if change.user == user && change.kind == kind => {
                    if deliver(&store, &user, kind, &query, &fold, &sender)
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Ok(_) => {}
                // A full recompute covers everything a lagged receiver
                // missed.
                Err(RecvError::Lagged(_)) => {
                    if deliver(&store, &user, kind, &query, &fold, &sender)
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Err(RecvError::Closed) => return,
            }
        }
    });

    Subscription { results, task }
}

struct SubscriberGone;

async fn deliver<S, T, Q, F>(
    store: &S,
    user: &UserId,
    kind: TransactionKind,
    query: &Q,
    fold: &F,
    sender: &mpsc::UnboundedSender<T>,
) -> Result<(), SubscriberGone>
where
    S: TransactionStore,
    T: Send + 'static,
    Q: Fn(Date) -> TransactionQuery,
    F: Fn(Vec<Transaction>, Date) -> T,
{
    let today = OffsetDateTime::now_utc().date();

    match store.range_query(user, kind, query(today)).await {
        Ok(records) => sender
            .send(fold(records, today))
            .map_err(|_| SubscriberGone),
        Err(error) => {
            tracing::error!(
                "could not recompute the {} view for {user}: {error}",
                kind.collection()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod subscription_tests {
    use time::OffsetDateTime;
    use tokio::time::timeout;

    use crate::models::{NewTransaction, TransactionKind, UserId};
    use crate::stores::{MemoryStore, TransactionQuery, TransactionStore};

    use super::watch;

    fn new_record(amount: f64) -> NewTransaction {
        NewTransaction {
            amount,
            category: "Other".to_owned(),
            description: String::new(),
            date: OffsetDateTime::now_utc(),
        }
    }

    fn watch_record_count(
        store: &MemoryStore,
        user: &UserId,
        kind: TransactionKind,
    ) -> super::Subscription<usize> {
        watch(
            store.clone(),
            user.clone(),
            kind,
            |_| TransactionQuery::default(),
            |records, _| records.len(),
        )
    }

    #[tokio::test]
    async fn subscription_delivers_the_initial_result_then_updates() {
        let store = MemoryStore::new();
        let user = UserId::new("ada");
        store
            .append(&user, TransactionKind::Income, new_record(10.0))
            .await
            .unwrap();

        let mut subscription = watch_record_count(&store, &user, TransactionKind::Income);

        assert_eq!(subscription.next().await, Some(1));

        store
            .append(&user, TransactionKind::Income, new_record(20.0))
            .await
            .unwrap();

        assert_eq!(subscription.next().await, Some(2));
    }

    #[tokio::test]
    async fn cancelled_subscription_stops_delivery() {
        let store = MemoryStore::new();
        let user = UserId::new("ada");

        let mut subscription = watch_record_count(&store, &user, TransactionKind::Spending);
        assert_eq!(subscription.next().await, Some(0));

        subscription.cancel();

        store
            .append(&user, TransactionKind::Spending, new_record(5.0))
            .await
            .unwrap();

        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn subscription_ignores_changes_to_other_logs() {
        let store = MemoryStore::new();
        let user = UserId::new("ada");

        let mut subscription = watch_record_count(&store, &user, TransactionKind::Income);
        assert_eq!(subscription.next().await, Some(0));

        store
            .append(&user, TransactionKind::Spending, new_record(5.0))
            .await
            .unwrap();
        store
            .append(&UserId::new("grace"), TransactionKind::Income, new_record(5.0))
            .await
            .unwrap();

        let no_delivery = timeout(
            std::time::Duration::from_millis(50),
            subscription.next(),
        )
        .await;

        assert!(no_delivery.is_err());
    }

    #[tokio::test]
    async fn concurrent_subscriptions_update_independently() {
        let store = MemoryStore::new();
        let user = UserId::new("ada");

        let mut income = watch_record_count(&store, &user, TransactionKind::Income);
        let mut spending = watch_record_count(&store, &user, TransactionKind::Spending);
        assert_eq!(income.next().await, Some(0));
        assert_eq!(spending.next().await, Some(0));

        store
            .append(&user, TransactionKind::Income, new_record(5.0))
            .await
            .unwrap();
        store
            .append(&user, TransactionKind::Spending, new_record(7.0))
            .await
            .unwrap();

        assert_eq!(income.next().await, Some(1));
        assert_eq!(spending.next().await, Some(1));
    }
}
