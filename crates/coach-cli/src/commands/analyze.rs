//! Analyze command implementation

use std::path::Path;

use anyhow::{Context, Result};
use coach_core::{AnalysisSummary, GoalConfig, GoalPace};

use super::{build_goal, money, run_analysis, truncate};
use crate::cli::{DatasetArgs, GoalArgs};

pub fn cmd_analyze(
    config_path: Option<&Path>,
    data: &DatasetArgs,
    goal_args: &GoalArgs,
    json: bool,
) -> Result<()> {
    let goal = build_goal(goal_args)?;
    let summary = run_analysis(config_path, data, &goal)?;

    if json {
        let output =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", output);
    } else {
        print_summary(&summary, &goal);
    }

    Ok(())
}

fn print_summary(summary: &AnalysisSummary, goal: &GoalConfig) {
    println!();
    println!("📊 Spending Summary");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Transactions:       {}", summary.transaction_count);
    println!("   Total spend:        {}", money(summary.total_spend));
    println!(
        "   Avg monthly spend:  {} ({})",
        money(summary.average_monthly_spend),
        summary.baseline
    );
    if let Some(month) = summary.most_expensive_month() {
        println!(
            "   Priciest month:     {} ({})",
            month.label(),
            money(month.total)
        );
    }

    if !summary.top_categories.is_empty() {
        println!();
        println!("   Top categories:");
        for cat in &summary.top_categories {
            println!(
                "     {:<30} {:>12}",
                truncate(&cat.category, 30),
                money(cat.total)
            );
        }
    }

    println!();
    println!("🎯 Goal");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Target:             {} in {} months",
        money(goal.target_amount),
        goal.horizon_months
    );
    println!("   Monthly income:     {}", money(goal.monthly_income));
    println!(
        "   Required savings:   {}/month",
        money(summary.required_monthly_savings)
    );
    println!(
        "   Current savings:    {}/month ({:.1}% of income)",
        money(summary.monthly_savings),
        summary.savings_rate_pct
    );
    println!("   Savings gap:        {}", money(summary.savings_gap));
    match summary.months_to_goal {
        GoalPace::Reachable { .. } => {
            println!("   Time to goal:       {}", summary.months_to_goal)
        }
        GoalPace::Unreachable => println!("   Time to goal:       ❌ {}", summary.months_to_goal),
    }
    if summary.on_track {
        println!("   ✅ On track");
    } else {
        println!("   ⚠️  Not on track");
    }

    if !summary.recurring_charges.is_empty() {
        println!();
        println!("🔁 Recurring Charges ({})", summary.recurring_charges.len());
        println!("   ─────────────────────────────────────────────────────────────");
        for charge in &summary.recurring_charges {
            let gray = if summary.gray_charges.contains(charge) {
                "  (gray)"
            } else {
                ""
            };
            println!(
                "   {:<30} {:>10} x {:<3} {:>12}{}",
                truncate(&charge.category, 30),
                money(charge.amount),
                charge.occurrences,
                money(charge.total()),
                gray
            );
        }
    }

    if !summary.large_charges.is_empty() {
        println!();
        println!("💸 Large Charges ({})", summary.large_charges.len());
        println!("   ─────────────────────────────────────────────────────────────");
        for tx in &summary.large_charges {
            let date = tx
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {:<10}  {:<30} {:>12}",
                date,
                truncate(&tx.category, 30),
                money(tx.amount)
            );
        }
    }

    println!();
}
