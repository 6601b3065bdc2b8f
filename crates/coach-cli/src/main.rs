//! Coach CLI - Personal finance coach
//!
//! Usage:
//!   coach analyze --file CSV --goal 3000 --months 10 --income 4000
//!   coach columns --file CSV     Show detected columns
//!   coach prompt --file CSV ...  Render the report prompt
//!   coach personas               List personas
//!   coach onboard                Set up a goal interactively

mod cli;
mod commands;


use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Analyze { data, goal, json } => {
            commands::cmd_analyze(config, &data, &goal, json)
        }
        Commands::Columns { file } => commands::cmd_columns(&file),
        Commands::Prompt {
            data,
            goal,
            persona,
        } => commands::cmd_prompt(config, &data, &goal, persona.as_deref()),
        Commands::Personas => commands::cmd_personas(),
        Commands::Onboard => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            commands::cmd_onboard(stdin.lock(), stdout.lock()).map(|_| ())
        }
    }
}
