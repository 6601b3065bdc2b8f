//! Windowing and spend aggregation
//!
//! Restricts the analysis to a recent window and derives the monthly spend
//! baseline. Two code paths exist:
//!
//! - **Dated**: at least one transaction has a date. Only dated transactions
//!   inside `[now - window_days, now]` take part, and the baseline is the mean
//!   of per-calendar-month totals.
//! - **Dateless**: no transaction has a date. Everything takes part and the
//!   baseline is estimated as `total / (window_days / 30)`. This is an
//!   approximation, reported as [`BaselineMethod::WindowEstimate`].

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::models::{BaselineMethod, CategoryTotal, MonthTotal, Transaction};

/// Days per month assumed by the dateless estimate
const DAYS_PER_MONTH: f64 = 30.0;

/// The transactions that take part in an analysis
#[derive(Debug, Clone)]
pub struct Window<'a> {
    pub transactions: Vec<&'a Transaction>,
    /// Whether the dataset carried any dates (and so was windowed)
    pub dated: bool,
    pub window_days: u32,
}

impl Window<'_> {
    pub fn total(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

/// Monthly spend baseline and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBaseline {
    pub average: f64,
    pub method: BaselineMethod,
    pub monthly_totals: Vec<MonthTotal>,
}

/// Select the transactions inside the window ending at `now` (inclusive)
///
/// When any transaction is dated, undated ones are left out. When none is,
/// all of them are kept and no windowing happens.
pub fn select_window(transactions: &[Transaction], window_days: u32, now: NaiveDate) -> Window<'_> {
    let dated = transactions.iter().any(|t| t.date.is_some());

    let selected: Vec<&Transaction> = if dated {
        // Windows reaching past the calendar's start include everything before `now`
        let start = now
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);
        transactions
            .iter()
            .filter(|t| t.date.is_some_and(|d| d >= start && d <= now))
            .collect()
    } else {
        transactions.iter().collect()
    };

    debug!(
        window_days,
        dated,
        selected = selected.len(),
        total = transactions.len(),
        "Selected analysis window"
    );

    Window {
        transactions: selected,
        dated,
        window_days,
    }
}

/// Compute the monthly spend baseline for a window
pub fn monthly_baseline(window: &Window<'_>) -> MonthlyBaseline {
    if !window.dated {
        // A zero-day window would divide by zero; treat it as one day
        let window_months = f64::from(window.window_days.max(1)) / DAYS_PER_MONTH;
        return MonthlyBaseline {
            average: window.total() / window_months,
            method: BaselineMethod::WindowEstimate {
                window_days: window.window_days,
            },
            monthly_totals: Vec::new(),
        };
    }

    let monthly_totals = monthly_totals(&window.transactions);
    let months = monthly_totals.len();
    let average = if months == 0 {
        0.0
    } else {
        monthly_totals.iter().map(|m| m.total).sum::<f64>() / months as f64
    };

    MonthlyBaseline {
        average,
        method: BaselineMethod::CalendarMonths { months },
        monthly_totals,
    }
}

/// Per-calendar-month totals in chronological order; undated rows are skipped
pub fn monthly_totals(transactions: &[&Transaction]) -> Vec<MonthTotal> {
    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for tx in transactions {
        if let Some(date) = tx.date {
            *by_month.entry((date.year(), date.month())).or_insert(0.0) += tx.amount;
        }
    }

    by_month
        .into_iter()
        .map(|((year, month), total)| MonthTotal { year, month, total })
        .collect()
}

/// Spend per category label, largest first (ties by label)
pub fn category_totals(transactions: &[&Transaction]) -> Vec<CategoryTotal> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in transactions {
        *by_category.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
    }

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// The `limit` largest categories
pub fn top_categories(transactions: &[&Transaction], limit: usize) -> Vec<CategoryTotal> {
    let mut totals = category_totals(transactions);
    totals.truncate(limit);
    totals
}
