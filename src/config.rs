//! Runtime configuration for the ledger core.

use time::Duration;

/// Tunable behavior for [Ledger](crate::Ledger).
///
/// The defaults reproduce the shipped application: a one-day shift on
/// picked dates, ten rows in the recent-transactions view, and a
/// thirty-day daily series.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Shift applied to user-picked transaction dates before storing.
    ///
    /// The shipped application advances picked dates by one day to
    /// compensate for a day-boundary display bug; set this to
    /// [Duration::ZERO] to store picked dates as-is. Only picked dates are
    /// shifted; "now" timestamps are stored verbatim.
    pub picked_date_offset: Duration,

    /// How many records the recent-transactions view delivers.
    pub recent_limit: usize,

    /// How many trailing calendar days the daily series covers.
    pub window_days: u32,

    /// Category labels seeded into new aggregate records for income.
    pub default_income_categories: Vec<String>,

    /// Category labels seeded into new aggregate records for spending.
    pub default_spending_categories: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            picked_date_offset: Duration::days(1),
            recent_limit: 10,
            window_days: 30,
            default_income_categories: vec!["Salary".to_owned(), "Other".to_owned()],
            default_spending_categories: vec![
                "Groceries".to_owned(),
                "Rent".to_owned(),
                "Utilities".to_owned(),
                "Entertainment".to_owned(),
                "Other".to_owned(),
            ],
        }
    }
}
