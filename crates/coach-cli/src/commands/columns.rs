//! Column detection report

use std::path::Path;

use anyhow::Result;
use coach_core::{normalize, resolve_columns, ColumnRole};

use super::load_dataset;

/// Show which source column was picked for each role
pub fn cmd_columns(file: &Path) -> Result<()> {
    let dataset = load_dataset(file)?;
    let mapping = resolve_columns(dataset.columns());

    println!();
    println!("🔎 Column Detection: {}", file.display());
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Columns: {}", dataset.columns().join(", "));
    println!();

    for role in [ColumnRole::Date, ColumnRole::Amount, ColumnRole::Category] {
        match mapping.get(role) {
            Some(column) => println!("   {:<10} → {}", role.as_str(), column),
            None if role == ColumnRole::Date => {
                println!("   {:<10} → (none, spending will be estimated)", role.as_str())
            }
            None => println!("   {:<10} → ❌ not found", role.as_str()),
        }
    }

    println!();
    match normalize(&dataset) {
        Ok(transactions) => {
            let dated = transactions.iter().filter(|t| t.date.is_some()).count();
            println!(
                "   Usable rows: {} of {} ({} with dates)",
                transactions.len(),
                dataset.len(),
                dated
            );
        }
        Err(e) => println!("   ❌ {}", e),
    }
    println!();

    Ok(())
}
