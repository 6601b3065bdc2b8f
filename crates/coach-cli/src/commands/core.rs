//! Shared utilities for commands (config, dataset and goal loading)

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use coach_core::import::load_path;
use coach_core::{AnalysisConfig, AnalysisSummary, GoalConfig, RawDataset, SpendingAnalyzer};
use tracing::debug;

use crate::cli::{DatasetArgs, GoalArgs};

/// Load analysis config from an explicit path or the default locations
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => AnalysisConfig::load().context("Failed to load analysis config"),
    }
}

pub fn load_dataset(file: &Path) -> Result<RawDataset> {
    load_path(file).with_context(|| format!("Failed to read {}", file.display()))
}

/// Parse `--now`, defaulting to today's local date
pub fn parse_now(now: Option<&str>) -> Result<NaiveDate> {
    match now {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --now date format (use YYYY-MM-DD)"),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn build_goal(args: &GoalArgs) -> Result<GoalConfig> {
    GoalConfig::new(args.goal, args.months, args.income).context("Invalid goal")
}

/// Load, normalize and analyze a dataset
pub fn run_analysis(
    config_path: Option<&Path>,
    data: &DatasetArgs,
    goal: &GoalConfig,
) -> Result<AnalysisSummary> {
    let mut config = load_config(config_path)?;
    if let Some(days) = data.window_days {
        anyhow::ensure!(days > 0, "--window-days must be at least 1");
        config = config.with_window_days(days);
    }

    let now = parse_now(data.now.as_deref())?;
    let dataset = load_dataset(&data.file)?;
    debug!(
        file = %data.file.display(),
        rows = dataset.len(),
        window_days = config.window_days,
        %now,
        "Running analysis"
    );

    SpendingAnalyzer::with_config(config)
        .analyze_dataset(&dataset, goal, now)
        .with_context(|| format!("Failed to analyze {}", data.file.display()))
}

/// Format a money amount with a dollar sign
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}
