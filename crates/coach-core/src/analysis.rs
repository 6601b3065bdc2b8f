//! Spending analyzer
//!
//! Runs the full pipeline over one dataset and goal:
//! normalize → window → baseline → recurring/gray detection → goal gap.
//!
//! The analyzer holds only its configuration. Every call is a pure function
//! of its inputs; "now" is passed in rather than read from the clock.

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{monthly_baseline, select_window, top_categories};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::goal::compute_goal_gap;
use crate::models::{AnalysisSummary, GoalConfig, RawDataset, Transaction};
use crate::normalize::normalize;
use crate::recurring::{detect_recurring, gray_charges, large_charges};

/// Analyze transactions with the default configuration
pub fn analyze(
    transactions: &[Transaction],
    goal: &GoalConfig,
    now: NaiveDate,
) -> Result<AnalysisSummary> {
    SpendingAnalyzer::new().analyze(transactions, goal, now)
}

/// Main analyzer that runs all stages
#[derive(Debug, Clone, Default)]
pub struct SpendingAnalyzer {
    config: AnalysisConfig,
}

impl SpendingAnalyzer {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Normalize a raw dataset, then analyze it
    pub fn analyze_dataset(
        &self,
        dataset: &RawDataset,
        goal: &GoalConfig,
        now: NaiveDate,
    ) -> Result<AnalysisSummary> {
        let transactions = normalize(dataset)?;
        self.analyze(&transactions, goal, now)
    }

    /// Analyze normalized transactions
    pub fn analyze(
        &self,
        transactions: &[Transaction],
        goal: &GoalConfig,
        now: NaiveDate,
    ) -> Result<AnalysisSummary> {
        let window = select_window(transactions, self.config.window_days, now);
        let baseline = monthly_baseline(&window);
        let gap = compute_goal_gap(goal, baseline.average)?;

        let recurring = detect_recurring(&window.transactions);
        let gray = gray_charges(
            &recurring,
            goal.monthly_income,
            self.config.gray_charge_fraction,
        );

        let summary = AnalysisSummary {
            average_monthly_spend: baseline.average,
            baseline: baseline.method,
            monthly_totals: baseline.monthly_totals,
            total_spend: window.total(),
            transaction_count: window.transactions.len(),
            monthly_savings: gap.monthly_savings,
            savings_rate_pct: gap.savings_rate_pct,
            required_monthly_savings: gap.required_monthly_savings,
            savings_gap: gap.savings_gap,
            months_to_goal: gap.months_to_goal,
            on_track: gap.on_track(),
            top_categories: top_categories(&window.transactions, self.config.top_categories),
            recurring_charges: recurring,
            gray_charges: gray,
            large_charges: large_charges(
                &window.transactions,
                self.config.large_charge_threshold,
            ),
        };

        info!(
            transactions = summary.transaction_count,
            baseline = %summary.baseline,
            average_monthly_spend = summary.average_monthly_spend,
            savings_gap = summary.savings_gap,
            recurring = summary.recurring_charges.len(),
            gray = summary.gray_charges.len(),
            "Analysis complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{BaselineMethod, GoalPace, RecurringCharge};
    use crate::test_utils::{dataset, streaming_fixture, tx, undated, ymd};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_streaming_scenario() {
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let summary = analyze(&streaming_fixture(), &goal, ymd(2024, 2, 1)).unwrap();

        assert_eq!(
            summary.recurring_charges,
            vec![RecurringCharge {
                category: "Streaming".into(),
                amount: 12.99,
                occurrences: 2,
            }]
        );
        assert_eq!(summary.baseline, BaselineMethod::CalendarMonths { months: 2 });
        assert!(approx(summary.average_monthly_spend, 37.99));
        assert!(approx(summary.monthly_savings, 962.01));
        assert!(approx(summary.required_monthly_savings, 100.0));
        assert_eq!(summary.savings_gap, 0.0);
        assert!(summary.on_track);
        // 12.99 is below 5% of 1000
        assert_eq!(summary.gray_charges, summary.recurring_charges);
        assert_eq!(summary.top_categories[0].category, "Groceries");
        assert_eq!(summary.most_expensive_month().unwrap().label(), "2024-01");
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn test_zero_income_scenario() {
        let goal = GoalConfig::new(600.0, 6, 0.0).unwrap();
        let summary = analyze(&streaming_fixture(), &goal, ymd(2024, 2, 1)).unwrap();
        assert_eq!(summary.savings_rate_pct, 0.0);
        assert!(summary.gray_charges.is_empty());
        assert_eq!(summary.recurring_charges.len(), 1);
        assert_eq!(summary.months_to_goal, GoalPace::Unreachable);
    }

    #[test]
    fn test_dateless_and_dated_baselines_differ() {
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let now = ymd(2024, 2, 1);

        let dated = analyze(&streaming_fixture(), &goal, now).unwrap();
        let dateless_txs: Vec<Transaction> = streaming_fixture()
            .into_iter()
            .map(|t| Transaction { date: None, ..t })
            .collect();
        let dateless = analyze(&dateless_txs, &goal, now).unwrap();

        assert!(approx(dated.total_spend, dateless.total_spend));
        assert_eq!(
            dateless.baseline,
            BaselineMethod::WindowEstimate { window_days: 60 }
        );
        // 75.98 / (60 / 30), which happens to equal the two-month mean here
        assert!(approx(dateless.average_monthly_spend, 37.99));
        // Over a 90-day window the estimate moves while the calendar mean does not
        let analyzer = SpendingAnalyzer::with_config(AnalysisConfig::default().with_window_days(90));
        let dateless_90 = analyzer.analyze(&dateless_txs, &goal, now).unwrap();
        let dated_90 = analyzer.analyze(&streaming_fixture(), &goal, now).unwrap();
        assert!(approx(dateless_90.average_monthly_spend, 75.98 / 3.0));
        assert!(approx(dated_90.average_monthly_spend, 37.99));
        assert!(!approx(
            dateless_90.average_monthly_spend,
            dated_90.average_monthly_spend
        ));
    }

    #[test]
    fn test_empty_dataset_degrades() {
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let summary = analyze(&[], &goal, ymd(2024, 2, 1)).unwrap();
        assert_eq!(summary.average_monthly_spend, 0.0);
        assert!(approx(summary.monthly_savings, 1000.0));
        assert!(summary.top_categories.is_empty());
        assert!(summary.recurring_charges.is_empty());
        assert_eq!(summary.transaction_count, 0);
    }

    #[test]
    fn test_single_transaction() {
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let summary = analyze(&[undated(30.0, "Gym")], &goal, ymd(2024, 2, 1)).unwrap();
        assert!(approx(summary.average_monthly_spend, 15.0));
        assert!(summary.recurring_charges.is_empty());
    }

    #[test]
    fn test_window_excludes_old_transactions() {
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let txs = vec![
            tx(ymd(2023, 6, 1), 500.0, "Vacation"),
            tx(ymd(2024, 1, 20), 40.0, "Groceries"),
        ];
        let summary = analyze(&txs, &goal, ymd(2024, 2, 1)).unwrap();
        assert_eq!(summary.transaction_count, 1);
        assert!(summary.large_charges.is_empty());
        assert!(approx(summary.average_monthly_spend, 40.0));
    }

    #[test]
    fn test_zero_horizon_is_error() {
        let goal = GoalConfig {
            target_amount: 600.0,
            horizon_months: 0,
            monthly_income: 1000.0,
        };
        let result = analyze(&streaming_fixture(), &goal, ymd(2024, 2, 1));
        assert!(matches!(result, Err(Error::DivisionByZero(_))));
    }

    #[test]
    fn test_analyze_dataset_unresolvable() {
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let ds = dataset(&["When", "Total"], &[&["2024-01-01", "5"]]);
        let result = SpendingAnalyzer::new().analyze_dataset(&ds, &goal, ymd(2024, 2, 1));
        assert!(matches!(result, Err(Error::UnresolvableSchema { .. })));
    }

    #[test]
    fn test_analyze_dataset_large_charges() {
        let goal = GoalConfig::new(600.0, 6, 3000.0).unwrap();
        let ds = dataset(
            &["Date", "Merchant", "Amount"],
            &[
                &["2024-01-05", "Landlord", "-1200"],
                &["2024-01-06", "Cafe", "-4.50"],
                &["2024-01-20", "Cafe", "-4.50"],
            ],
        );
        let summary = SpendingAnalyzer::new()
            .analyze_dataset(&ds, &goal, ymd(2024, 1, 31))
            .unwrap();
        assert_eq!(summary.large_charges.len(), 1);
        assert_eq!(summary.large_charges[0].category, "Landlord");
        assert_eq!(summary.gray_charges.len(), 1);
        assert_eq!(summary.gray_charges[0].category, "Cafe");
    }

    #[test]
    fn test_configured_huge_window() {
        let config = crate::config::parse_config("[analysis]\nwindow_days = 200000000\n").unwrap();
        let goal = GoalConfig::new(600.0, 6, 1000.0).unwrap();
        let summary = SpendingAnalyzer::with_config(config)
            .analyze(&[tx(ymd(2024, 1, 1), 5.0, "A")], &goal, ymd(2024, 2, 1))
            .unwrap();
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.average_monthly_spend, 5.0);
    }
}
