//! Dataset loaders
//!
//! Turn transaction exports into a [`RawDataset`]. Loaders make no attempt to
//! interpret columns; that is the normalizer's job.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RawDataset, RawValue};

/// Supported dataset file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "json" => Ok(DatasetFormat::Json),
            _ => Err(Error::UnsupportedFormat(format!(
                "{} (expected .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// Load a dataset file, choosing the parser by extension
pub fn load_path(path: &Path) -> Result<RawDataset> {
    let format = DatasetFormat::from_path(path)?;
    let file = File::open(path)?;
    match format {
        DatasetFormat::Csv => load_csv(file),
        DatasetFormat::Json => load_json(file),
    }
}

/// Parse CSV with a header row; empty cells become [`RawValue::Empty`]
pub fn load_csv<R: Read>(reader: R) -> Result<RawDataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = unique_headers(rdr.headers()?.iter());
    let mut dataset = RawDataset::with_columns(headers.iter());

    for result in rdr.records() {
        let record = result?;
        dataset.push_row(headers.iter().enumerate().map(|(i, header)| {
            let value = match record.get(i) {
                Some(cell) if !cell.trim().is_empty() => RawValue::Text(cell.to_string()),
                _ => RawValue::Empty,
            };
            (header.clone(), value)
        }));
    }

    debug!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Loaded CSV dataset"
    );
    Ok(dataset)
}

/// Parse a JSON array of flat objects, keeping key order
pub fn load_json<R: Read>(reader: R) -> Result<RawDataset> {
    let rows: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;
    let mut dataset = RawDataset::new();

    for row in rows {
        dataset.push_row(row.into_iter().map(|(key, value)| (key, json_to_raw(value))));
    }

    debug!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Loaded JSON dataset"
    );
    Ok(dataset)
}

/// Repeated header names get a `_2`, `_3`, ... suffix so every cell keeps its own column
fn unique_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for header in headers {
        let mut name = header.to_string();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{}_{}", header, n);
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }

    out
}

fn json_to_raw(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Empty,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Empty),
        Value::String(s) if s.trim().is_empty() => RawValue::Empty,
        Value::String(s) => RawValue::Text(s),
        // Nested values are kept as their JSON text
        other => RawValue::Text(other.to_string()),
    }
}
