//! A scripted walkthrough of the ledger core against the in-memory store.

use clap::Parser;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use easy_budget::{
    Confirmation, Ledger, LedgerConfig,
    models::{TransactionForm, TransactionKind, User, UserId},
    stores::MemoryStore,
};

/// Walks through a budgeting session: sign-in, live views, two
/// transactions, and a delete.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The user id to run the session as.
    #[arg(long, default_value = "demo-user")]
    user_id: String,

    /// The display name reported by the identity provider.
    #[arg(long, default_value = "Demo User")]
    display_name: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();
    let signed_in = User {
        id: UserId::new(args.user_id),
        display_name: args.display_name,
        photo_url: None,
    };
    let user = signed_in.id.clone();

    let store = MemoryStore::new();
    let ledger = Ledger::new(store.clone(), store, LedgerConfig::default());

    let aggregate = ledger
        .ensure_aggregate(&user)
        .await
        .expect("could not initialize the aggregate record");
    println!(
        "signed in as {} ({user}) with balance {:.2}",
        signed_in.display_name, aggregate.current_balance
    );

    let mut recent = ledger.watch_recent(&user, TransactionKind::Spending);
    let mut monthly_spending = ledger.watch_monthly_total(&user, TransactionKind::Spending);

    // Drain the initial (empty) results so later deliveries reflect the
    // session's writes.
    recent.next().await;
    monthly_spending.next().await;

    let paycheck = ledger
        .add_transaction(
            &user,
            TransactionKind::Income,
            TransactionForm::new(1250.0, "Salary").description("Monthly paycheck"),
        )
        .await
        .expect("could not record the paycheck");
    println!(
        "recorded income of {:.2}, balance is now {:.2}",
        paycheck.transaction.amount, paycheck.new_balance
    );

    let groceries = ledger
        .add_transaction(
            &user,
            TransactionKind::Spending,
            TransactionForm::new(86.40, "Groceries").date(OffsetDateTime::now_utc().date()),
        )
        .await
        .expect("could not record the groceries");
    println!(
        "recorded spending of {:.2}, balance is now {:.2}",
        groceries.transaction.amount, groceries.new_balance
    );

    if let Some(records) = recent.next().await {
        println!(
            "latest spending transactions:\n{}",
            serde_json::to_string_pretty(&records).expect("could not render transactions")
        );
    }
    if let Some(total) = monthly_spending.next().await {
        println!("this month you have spent: {total:.2}");
    }

    let deletion = ledger
        .delete_transaction(
            &user,
            TransactionKind::Spending,
            &groceries.transaction,
            Confirmation::Confirmed,
        )
        .await
        .expect("could not delete the groceries");
    println!("deleted the groceries: {deletion:?}");

    if let Some(total) = monthly_spending.next().await {
        println!("this month you have spent: {total:.2}");
    }

    recent.cancel();
    monthly_spending.cancel();

    let balance = ledger
        .balance(&user)
        .await
        .expect("could not read the balance");
    println!("final balance: {balance:.2}");
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
