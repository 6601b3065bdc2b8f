//! Interactive goal setup

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use coach_core::{GoalConfig, Onboarding};

use super::money;

/// Ask for goal amount, timeframe and income until every answer is valid
pub fn cmd_onboard<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<GoalConfig> {
    let mut onboarding = Onboarding::new();

    writeln!(output, "🎯 Let's set up your savings goal.")?;

    while let Some(question) = onboarding.prompt() {
        write!(output, "{} ", question)?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            bail!("Input ended before onboarding was complete");
        }

        if let Err(e) = onboarding.answer(&line) {
            writeln!(output, "   ✗ {}", e)?;
        }
    }

    let Some(goal) = onboarding.goal() else {
        bail!("Onboarding finished without a valid goal");
    };

    writeln!(output)?;
    writeln!(
        output,
        "✅ Goal: save {} in {} months on {} a month.",
        money(goal.target_amount),
        goal.horizon_months,
        money(goal.monthly_income)
    )?;
    writeln!(
        output,
        "   Run: coach analyze --file <export.csv> --goal {} --months {} --income {}",
        goal.target_amount, goal.horizon_months, goal.monthly_income
    )?;

    Ok(goal)
}
