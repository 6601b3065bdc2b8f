//! Recurring and gray-charge detection
//!
//! Detects:
//! - Recurring charges: the same category label charged the same amount more
//!   than once (candidate subscriptions)
//! - Gray charges: recurring charges small enough to go unnoticed, below a
//!   fraction of monthly income
//! - Large charges: single transactions above a fixed threshold
//!
//! Grouping is an exact-match heuristic. Amounts must be identical ($9.99 and
//! $10.00 are separate groups) and a merchant relabeled between statements
//! counts as a different category. Subscriptions with price drift from tax
//! changes or promo pricing are therefore missed. This is a known limitation.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{RecurringCharge, Transaction};

/// Find (category, amount) groups that occur more than once
///
/// Output is sorted by category, then amount, so it does not depend on the
/// order of the input rows.
pub fn detect_recurring(transactions: &[&Transaction]) -> Vec<RecurringCharge> {
    // f64 bit patterns give exact-equality keys
    let mut groups: HashMap<(&str, u64), usize> = HashMap::new();
    for tx in transactions {
        *groups
            .entry((tx.category.as_str(), tx.amount.to_bits()))
            .or_insert(0) += 1;
    }

    let mut recurring: Vec<RecurringCharge> = groups
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((category, bits), occurrences)| RecurringCharge {
            category: category.to_string(),
            amount: f64::from_bits(bits),
            occurrences,
        })
        .collect();
    recurring.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.amount.total_cmp(&b.amount))
    });

    debug!(groups = recurring.len(), "Detected recurring charges");
    recurring
}

/// Recurring charges whose amount is strictly below `monthly_income * fraction`
///
/// With zero income the threshold is zero and nothing qualifies.
pub fn gray_charges(
    recurring: &[RecurringCharge],
    monthly_income: f64,
    fraction: f64,
) -> Vec<RecurringCharge> {
    let threshold = (monthly_income * fraction).max(0.0);
    recurring
        .iter()
        .filter(|r| r.amount < threshold)
        .cloned()
        .collect()
}

/// Transactions strictly above `threshold`, largest first
pub fn large_charges(transactions: &[&Transaction], threshold: f64) -> Vec<Transaction> {
    let mut large: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.amount > threshold)
        .map(|t| (*t).clone())
        .collect();
    large.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    large
}
