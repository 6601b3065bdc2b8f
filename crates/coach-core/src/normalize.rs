//! Column normalizer
//!
//! Maps a dataset with arbitrary column names onto the canonical
//! [`Transaction`] schema. Columns are matched to roles by keyword using the
//! rule table below: for each role, the first column (in original order)
//! whose lower-cased name contains any of the role's keywords wins.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ColumnRole, RawDataset, RawValue, Transaction};

/// Role → keyword set. First match over columns wins.
pub const COLUMN_RULES: &[(ColumnRole, &[&str])] = &[
    (ColumnRole::Date, &["date", "time", "day"]),
    (
        ColumnRole::Amount,
        &["amount", "value", "cost", "price", "outflow"],
    ),
    (
        ColumnRole::Category,
        &["category", "merchant", "description"],
    ),
];

/// Plain date formats, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%m/%d/%y", // 01/15/24 (before %Y, which would read "24" as year 24)
    "%m/%d/%Y", // 01/15/2024
    "%m-%d-%Y", // 01-15-2024
    "%d/%m/%Y", // 15/01/2024 (European)
    "%Y/%m/%d", // 2024/01/15
    "%d.%m.%Y", // 15.01.2024
    "%b %d, %Y", // Jan 15, 2024
    "%d %b %Y", // 15 Jan 2024
];

/// Date-time formats whose date part is kept
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Numeric date cells inside this range are read as spreadsheet serial dates
/// (roughly 1954 to 2119); anything else is treated as unparsable.
const SERIAL_DATE_RANGE: std::ops::RangeInclusive<f64> = 20_000.0..=80_000.0;

/// Source column chosen for each role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Date => self.date.as_deref(),
            ColumnRole::Amount => self.amount.as_deref(),
            ColumnRole::Category => self.category.as_deref(),
        }
    }

    fn set(&mut self, role: ColumnRole, column: String) {
        match role {
            ColumnRole::Date => self.date = Some(column),
            ColumnRole::Amount => self.amount = Some(column),
            ColumnRole::Category => self.category = Some(column),
        }
    }

    /// Required roles (amount, category) that matched no column
    pub fn missing_required(&self) -> Vec<ColumnRole> {
        [ColumnRole::Amount, ColumnRole::Category]
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }
}

/// Resolve each role to the first matching column
pub fn resolve_columns<S: AsRef<str>>(columns: &[S]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for (role, keywords) in COLUMN_RULES {
        let found = columns.iter().find(|column| {
            let lower = column.as_ref().to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        });
        if let Some(column) = found {
            mapping.set(*role, column.as_ref().to_string());
        }
    }

    mapping
}

/// Normalize a raw dataset into transactions, preserving row order
///
/// Rows whose amount is not numeric or whose category is empty are dropped.
/// Unparsable dates become `None` without dropping the row. Fails with
/// [`Error::UnresolvableSchema`] when the amount or category role matches no
/// column at all.
pub fn normalize(dataset: &RawDataset) -> Result<Vec<Transaction>> {
    let mapping = resolve_columns(dataset.columns());
    debug!(
        date = ?mapping.date,
        amount = ?mapping.amount,
        category = ?mapping.category,
        "Resolved columns"
    );

    let (amount_col, category_col) =
        match (mapping.amount.as_deref(), mapping.category.as_deref()) {
            (Some(amount), Some(category)) => (amount, category),
            _ => {
                return Err(Error::UnresolvableSchema {
                    missing: mapping.missing_required(),
                })
            }
        };

    let mut transactions = Vec::with_capacity(dataset.len());
    for row in dataset.rows() {
        let Some(amount) = row.get(amount_col).and_then(parse_amount) else {
            continue;
        };
        let Some(category) = row.get(category_col).and_then(parse_category) else {
            continue;
        };
        let date = mapping
            .date
            .as_deref()
            .and_then(|col| row.get(col))
            .and_then(parse_date);

        transactions.push(Transaction {
            date,
            amount: amount.abs(),
            category,
        });
    }

    debug!(
        retained = transactions.len(),
        dropped = dataset.len() - transactions.len(),
        "Normalized dataset"
    );
    Ok(transactions)
}

/// Coerce a cell to a finite number
///
/// Text may carry currency symbols and thousands separators; `(x)` reads as `-x`.
pub fn parse_amount(value: &RawValue) -> Option<f64> {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => {
            let cleaned: String = s
                .trim()
                .replace(['$', '€', '£', ',', ' '], "")
                .replace('(', "-")
                .replace(')', "");
            cleaned.parse::<f64>().ok()?
        }
        RawValue::Bool(_) | RawValue::Empty => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_category(value: &RawValue) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Some(value.to_string().trim().to_string())
}

/// Parse a cell into a calendar date, `None` when nothing fits
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Text(s) => parse_date_str(s),
        RawValue::Number(n) if SERIAL_DATE_RANGE.contains(n) => serial_to_date(*n),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Spreadsheet serial day number to date (1899-12-30 epoch)
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::dataset;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_columns_keywords() {
        let mapping = resolve_columns(&["Posted On", "Transaction Date", "Merchant Name", "Cost"]);
        assert_eq!(mapping.date.as_deref(), Some("Transaction Date"));
        assert_eq!(mapping.amount.as_deref(), Some("Cost"));
        assert_eq!(mapping.category.as_deref(), Some("Merchant Name"));
    }

    #[test]
    fn test_resolve_columns_first_match_wins() {
        let mapping = resolve_columns(&["Description", "Category", "Amount", "Price"]);
        assert_eq!(mapping.category.as_deref(), Some("Description"));
        assert_eq!(mapping.amount.as_deref(), Some("Amount"));
        assert_eq!(mapping.date, None);
    }

    #[test]
    fn test_resolve_columns_case_insensitive() {
        let mapping = resolve_columns(&["DAY", "OUTFLOW", "MERCHANT"]);
        assert_eq!(mapping.date.as_deref(), Some("DAY"));
        assert_eq!(mapping.amount.as_deref(), Some("OUTFLOW"));
        assert_eq!(mapping.category.as_deref(), Some("MERCHANT"));
    }

    #[test]
    fn test_unresolvable_schema() {
        let ds = dataset(&["When", "How much", "Where"], &[&["2024-01-01", "5", "Cafe"]]);
        match normalize(&ds) {
            Err(Error::UnresolvableSchema { missing }) => {
                assert_eq!(missing, vec![ColumnRole::Amount, ColumnRole::Category]);
            }
            other => panic!("expected UnresolvableSchema, got {:?}", other),
        }

        let ds = dataset(&["Date", "Amount"], &[&["2024-01-01", "5"]]);
        match normalize(&ds) {
            Err(Error::UnresolvableSchema { missing }) => {
                assert_eq!(missing, vec![ColumnRole::Category]);
            }
            other => panic!("expected UnresolvableSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_schema_on_empty_dataset_header() {
        let ds = RawDataset::new();
        assert!(matches!(
            normalize(&ds),
            Err(Error::UnresolvableSchema { .. })
        ));
    }

    #[test]
    fn test_rows_missing_amount_or_category_dropped() {
        let ds = dataset(
            &["Date", "Category", "Amount"],
            &[
                &["2024-01-01", "Groceries", "-50.00"],
                &["2024-01-02", "", "10"],
                &["2024-01-03", "Coffee", "n/a"],
                &["2024-01-04", "Coffee", ""],
                &["2024-01-05", "Rent", "$1,200.00"],
            ],
        );
        let txs = normalize(&ds).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].category, "Groceries");
        assert_eq!(txs[0].amount, 50.0);
        assert_eq!(txs[1].category, "Rent");
        assert_eq!(txs[1].amount, 1200.0);
    }

    #[test]
    fn test_unparsable_date_keeps_row() {
        let ds = dataset(
            &["Date", "Merchant", "Amount"],
            &[&["not a date", "Gym", "30"], &["01/15/2024", "Gym", "30"]],
        );
        let txs = normalize(&ds).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, None);
        assert_eq!(txs[1].date, Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_no_date_column() {
        let ds = dataset(&["Description", "Value"], &[&["Netflix", "15.49"]]);
        let txs = normalize(&ds).unwrap();
        assert_eq!(txs, vec![Transaction::new(None, 15.49, "Netflix")]);
    }

    #[test]
    fn test_preserves_row_order() {
        let ds = dataset(
            &["Category", "Amount"],
            &[&["C", "3"], &["A", "1"], &["B", "2"]],
        );
        let categories: Vec<_> = normalize(&ds)
            .unwrap()
            .into_iter()
            .map(|t| t.category)
            .collect();
        assert_eq!(categories, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&"$1,234.56".into()), Some(1234.56));
        assert_eq!(parse_amount(&"-123.45".into()), Some(-123.45));
        assert_eq!(parse_amount(&"(100.00)".into()), Some(-100.0));
        assert_eq!(parse_amount(&RawValue::Number(7.5)), Some(7.5));
        assert_eq!(parse_amount(&RawValue::Number(f64::NAN)), None);
        assert_eq!(parse_amount(&"inf".into()), None);
        assert_eq!(parse_amount(&"twelve".into()), None);
        assert_eq!(parse_amount(&RawValue::Bool(true)), None);
        assert_eq!(parse_amount(&RawValue::Empty), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Some(ymd(2024, 1, 15));
        assert_eq!(parse_date(&"2024-01-15".into()), expected);
        assert_eq!(parse_date(&"01/15/2024".into()), expected);
        assert_eq!(parse_date(&"01/15/24".into()), expected);
        assert_eq!(parse_date(&"15/01/2024".into()), expected);
        assert_eq!(parse_date(&"2024/01/15".into()), expected);
        assert_eq!(parse_date(&"15.01.2024".into()), expected);
        assert_eq!(parse_date(&"Jan 15, 2024".into()), expected);
        assert_eq!(parse_date(&"2024-01-15 08:30:00".into()), expected);
        assert_eq!(parse_date(&"2024-01-15T08:30:00".into()), expected);
        assert_eq!(parse_date(&"2024-01-15T08:30:00+02:00".into()), expected);
        assert_eq!(parse_date(&"yesterday".into()), None);
        assert_eq!(parse_date(&RawValue::Empty), None);
    }

    #[test]
    fn test_parse_serial_date() {
        // 45306 = 2024-01-15 in spreadsheet serial numbering
        assert_eq!(
            parse_date(&RawValue::Number(45306.0)),
            Some(ymd(2024, 1, 15))
        );
        // Small numbers are days of month or similar, not serial dates
        assert_eq!(parse_date(&RawValue::Number(15.0)), None);
    }

    #[test]
    fn test_numeric_category_kept() {
        let mut ds = RawDataset::new();
        ds.push_row(vec![
            ("Category", RawValue::Number(42.0)),
            ("Amount", RawValue::Number(-3.0)),
        ]);
        let txs = normalize(&ds).unwrap();
        assert_eq!(txs[0].category, "42");
        assert_eq!(txs[0].amount, 3.0);
    }
}
