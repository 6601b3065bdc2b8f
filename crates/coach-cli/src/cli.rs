//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Coach - See where your money goes and whether your goal is in reach
#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Personal finance coach: spending analysis and goal tracking", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which transactions to analyze
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Transaction export (.csv or .json)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Analysis window in days (overrides config)
    #[arg(long)]
    pub window_days: Option<u32>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<String>,
}

/// The savings goal
#[derive(Args, Debug, Clone)]
pub struct GoalArgs {
    /// Amount to save
    #[arg(short, long)]
    pub goal: f64,

    /// Months to reach the goal
    #[arg(short, long)]
    pub months: u32,

    /// Monthly income
    #[arg(short, long)]
    pub income: f64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze spending against a savings goal
    Analyze {
        #[command(flatten)]
        data: DatasetArgs,

        #[command(flatten)]
        goal: GoalArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which columns were detected as date, amount and category
    Columns {
        /// Transaction export (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Render the coach report prompt for a dataset
    Prompt {
        #[command(flatten)]
        data: DatasetArgs,

        #[command(flatten)]
        goal: GoalArgs,

        /// Persona id or name (defaults to the library default)
        #[arg(short, long)]
        persona: Option<String>,
    },

    /// List available personas
    Personas,

    /// Set up a savings goal interactively
    Onboard,
}
