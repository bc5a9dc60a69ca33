//! Pure recompute algorithms for the derived dashboard views.
//!
//! These run in full on every change notification; delivery to a UI is the
//! caller's concern.

use serde::Serialize;
use time::{Date, Duration};

use crate::models::Transaction;

/// The summed amount for a single calendar day in a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    /// The calendar day the sum is for.
    pub date: Date,
    /// Sum of the amounts of every record dated on that day. Zero when the
    /// day has no records.
    pub total: f64,
}

/// Sum the amounts of `transactions` per calendar day over the trailing
/// `days`-day window ending at `today`.
///
/// The result has exactly `days` entries: entry 0 is `today`, entry i is
/// `today` minus i days. Each entry carries its date so consumers align by
/// day rather than by raw index. The result depends only on the record
/// dates and amounts, not on the order they are given in.
pub fn daily_totals(transactions: &[Transaction], today: Date, days: u32) -> Vec<DailyTotal> {
    (0..days)
        .map(|offset| {
            let date = today - Duration::days(i64::from(offset));
            let total = transactions
                .iter()
                .filter(|transaction| transaction.date.date() == date)
                .map(|transaction| transaction.amount)
                .sum();

            DailyTotal { date, total }
        })
        .collect()
}

/// Sum the amounts of all `transactions`.
pub fn sum_amounts(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum()
}

/// The first day of the month that `date` falls in.
pub fn month_start(date: Date) -> Date {
    date.replace_day(1).expect("invalid month start date")
}
