//! Domain models for Coach

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single raw cell value as handed over by a dataset loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl RawValue {
    /// True for missing cells and whitespace-only text
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Empty => Ok(()),
        }
    }
}

/// A tabular dataset with arbitrary column names
///
/// Column order is the order in which names were first seen, which is what
/// column detection resolves against.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    columns: Vec<String>,
    rows: Vec<HashMap<String, RawValue>>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset with a fixed header
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for column in columns {
            dataset.add_column(column.into());
        }
        dataset
    }

    /// Append a row, registering any column names not seen before
    pub fn push_row<I, K>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        let mut row = HashMap::new();
        for (key, value) in cells {
            let key = key.into();
            self.add_column(key.clone());
            row.insert(key, value);
        }
        self.rows.push(row);
    }

    fn add_column(&mut self, name: String) {
        if !self.columns.contains(&name) {
            self.columns.push(name);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HashMap<String, RawValue>] {
        &self.rows
    }

    /// Cell lookup; cells absent from a row read as `None`
    pub fn get(&self, row: usize, column: &str) -> Option<&RawValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Semantic role a source column can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Date,
    Amount,
    Category,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::Amount => "amount",
            ColumnRole::Category => "category",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Absent when no date column was detected or the cell did not parse
    pub date: Option<NaiveDate>,
    /// Outflow magnitude, always >= 0
    pub amount: f64,
    /// Merchant or category label as given by the source
    pub category: String,
}

impl Transaction {
    pub fn new(date: Option<NaiveDate>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date,
            amount: amount.abs(),
            category: category.into(),
        }
    }
}

/// The user's savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub target_amount: f64,
    pub horizon_months: u32,
    pub monthly_income: f64,
}

impl GoalConfig {
    /// Build a validated goal
    pub fn new(target_amount: f64, horizon_months: u32, monthly_income: f64) -> Result<Self> {
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(Error::InvalidGoal(format!(
                "target amount must be positive, got {}",
                target_amount
            )));
        }
        if horizon_months < 1 {
            return Err(Error::InvalidGoal(
                "horizon must be at least one month".into(),
            ));
        }
        if !monthly_income.is_finite() || monthly_income < 0.0 {
            return Err(Error::InvalidGoal(format!(
                "monthly income must be zero or more, got {}",
                monthly_income
            )));
        }
        Ok(Self {
            target_amount,
            horizon_months,
            monthly_income,
        })
    }
}

/// How `average_monthly_spend` was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BaselineMethod {
    /// Mean of per-calendar-month totals. A single month is just that month's sum.
    CalendarMonths { months: usize },
    /// No dates available: `total / (window_days / 30)`. An approximation,
    /// not a true monthly average.
    WindowEstimate { window_days: u32 },
}

impl BaselineMethod {
    pub fn is_estimate(&self) -> bool {
        matches!(self, BaselineMethod::WindowEstimate { .. })
    }
}

impl fmt::Display for BaselineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaselineMethod::CalendarMonths { months: 1 } => {
                write!(f, "single calendar month")
            }
            BaselineMethod::CalendarMonths { months } => {
                write!(f, "mean of {} calendar months", months)
            }
            BaselineMethod::WindowEstimate { window_days } => {
                write!(f, "estimated from {}-day total (no dates)", window_days)
            }
        }
    }
}

/// Spend total for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl MonthTotal {
    /// "YYYY-MM"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Spend total for one category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// A group of transactions sharing category and exact amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringCharge {
    pub category: String,
    pub amount: f64,
    pub occurrences: usize,
}

impl RecurringCharge {
    /// Combined spend of every occurrence in the group
    pub fn total(&self) -> f64 {
        self.amount * self.occurrences as f64
    }
}

/// Time needed to reach the goal at the current savings pace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalPace {
    Reachable { months: f64 },
    /// Monthly savings are zero
    Unreachable,
}

impl GoalPace {
    pub fn months(&self) -> Option<f64> {
        match self {
            GoalPace::Reachable { months } => Some(*months),
            GoalPace::Unreachable => None,
        }
    }
}

impl fmt::Display for GoalPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalPace::Reachable { months } => write!(f, "{:.1} months", months),
            GoalPace::Unreachable => write!(f, "unreachable at current pace"),
        }
    }
}

/// Structured facts derived from one dataset and goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub average_monthly_spend: f64,
    pub baseline: BaselineMethod,
    /// Chronological; empty when the baseline is a window estimate
    pub monthly_totals: Vec<MonthTotal>,
    pub total_spend: f64,
    /// Transactions that took part in the analysis after windowing
    pub transaction_count: usize,
    pub monthly_savings: f64,
    pub savings_rate_pct: f64,
    pub required_monthly_savings: f64,
    pub savings_gap: f64,
    pub months_to_goal: GoalPace,
    pub on_track: bool,
    pub top_categories: Vec<CategoryTotal>,
    pub recurring_charges: Vec<RecurringCharge>,
    /// Always a subset of `recurring_charges`
    pub gray_charges: Vec<RecurringCharge>,
    pub large_charges: Vec<Transaction>,
}

impl AnalysisSummary {
    /// Month with the highest spend, earliest on ties
    pub fn most_expensive_month(&self) -> Option<&MonthTotal> {
        self.monthly_totals
            .iter()
            .fold(None, |best: Option<&MonthTotal>, m| match best {
                Some(b) if b.total >= m.total => Some(b),
                _ => Some(m),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_config_validation() {
        assert!(GoalConfig::new(600.0, 6, 1000.0).is_ok());
        assert!(GoalConfig::new(600.0, 6, 0.0).is_ok());
        assert!(matches!(
            GoalConfig::new(0.0, 6, 1000.0),
            Err(Error::InvalidGoal(_))
        ));
        assert!(matches!(
            GoalConfig::new(600.0, 0, 1000.0),
            Err(Error::InvalidGoal(_))
        ));
        assert!(matches!(
            GoalConfig::new(600.0, 6, -1.0),
            Err(Error::InvalidGoal(_))
        ));
        assert!(GoalConfig::new(f64::NAN, 6, 1.0).is_err());
    }

    #[test]
    fn test_transaction_new_takes_magnitude() {
        let tx = Transaction::new(None, -12.5, "Coffee");
        assert_eq!(tx.amount, 12.5);
    }

    #[test]
    fn test_raw_dataset_column_order() {
        let mut ds = RawDataset::new();
        ds.push_row(vec![("Date", RawValue::from("2024-01-01"))]);
        ds.push_row(vec![
            ("Date", RawValue::from("2024-01-02")),
            ("Amount", RawValue::from(3.0)),
        ]);
        assert_eq!(ds.columns(), &["Date".to_string(), "Amount".to_string()]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0, "Amount"), None);
        assert_eq!(ds.get(1, "Amount"), Some(&RawValue::Number(3.0)));
    }

    #[test]
    fn test_raw_value_json() {
        let values: Vec<RawValue> =
            serde_json::from_str(r#"[1.5, "x", null, true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Number(1.5),
                RawValue::Text("x".into()),
                RawValue::Empty,
                RawValue::Bool(true),
            ]
        );
        assert!(RawValue::Text("  ".into()).is_empty());
    }

    #[test]
    fn test_most_expensive_month() {
        let summary = AnalysisSummary {
            average_monthly_spend: 0.0,
            baseline: BaselineMethod::CalendarMonths { months: 2 },
            monthly_totals: vec![
                MonthTotal { year: 2024, month: 1, total: 62.99 },
                MonthTotal { year: 2024, month: 2, total: 12.99 },
            ],
            total_spend: 75.98,
            transaction_count: 3,
            monthly_savings: 0.0,
            savings_rate_pct: 0.0,
            required_monthly_savings: 0.0,
            savings_gap: 0.0,
            months_to_goal: GoalPace::Unreachable,
            on_track: true,
            top_categories: vec![],
            recurring_charges: vec![],
            gray_charges: vec![],
            large_charges: vec![],
        };
        assert_eq!(summary.most_expensive_month().unwrap().label(), "2024-01");
    }

    #[test]
    fn test_goal_pace_display() {
        assert_eq!(GoalPace::Reachable { months: 6.24 }.to_string(), "6.2 months");
        assert_eq!(
            GoalPace::Unreachable.to_string(),
            "unreachable at current pace"
        );
    }
}
