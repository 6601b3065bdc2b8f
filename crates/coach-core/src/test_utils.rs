//! Fixture builders shared by unit tests, integration tests and the CLI tests

use chrono::NaiveDate;

use crate::models::{RawDataset, RawValue, Transaction};

/// Build a dataset from a header and text rows, as a CSV loader would
///
/// Empty cells become [`RawValue::Empty`].
pub fn dataset(columns: &[&str], rows: &[&[&str]]) -> RawDataset {
    let mut ds = RawDataset::with_columns(columns.iter().copied());
    for row in rows {
        ds.push_row(columns.iter().zip(row.iter()).map(|(col, cell)| {
            let value = if cell.is_empty() {
                RawValue::Empty
            } else {
                RawValue::from(*cell)
            };
            (col.to_string(), value)
        }));
    }
    ds
}

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// A dated transaction
pub fn tx(date: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(Some(date), amount, category)
}

/// A transaction without a date
pub fn undated(amount: f64, category: &str) -> Transaction {
    Transaction::new(None, amount, category)
}

/// The three-row streaming/groceries fixture used across the test suites
pub fn streaming_fixture() -> Vec<Transaction> {
    vec![
        tx(ymd(2024, 1, 1), 12.99, "Streaming"),
        tx(ymd(2024, 2, 1), 12.99, "Streaming"),
        tx(ymd(2024, 1, 15), 50.0, "Groceries"),
    ]
}

/// CSV text with a realistic bank-export header and mixed quality rows
pub fn sample_csv() -> &'static str {
    r#"Transaction Date,Description,Category,Amount,Running Balance
01/01/2024,NETFLIX.COM,Streaming,-12.99,987.01
01/15/2024,WHOLE FOODS,Groceries,-50.00,937.01
02/01/2024,NETFLIX.COM,Streaming,-12.99,924.02
02/03/2024,LANDLORD LLC,Rent,-800.00,124.02
02/04/2024,MYSTERY,,-3.00,121.02
02/05/2024,COFFEE,Coffee,pending,121.02
"#
}
