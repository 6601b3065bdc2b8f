//! Error types for Coach

use thiserror::Error;

use crate::models::ColumnRole;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unresolvable schema: no column matches {}", format_roles(.missing))]
    UnresolvableSchema { missing: Vec<ColumnRole> },

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

fn format_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
