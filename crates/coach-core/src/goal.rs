//! Goal-gap calculator
//!
//! Turns the monthly spend baseline and a [`GoalConfig`] into feasibility
//! numbers. Savings are never negative: overspending shows up as zero
//! savings, and the deficit itself is left to callers.

use crate::error::{Error, Result};
use crate::models::{GoalConfig, GoalPace};

/// Feasibility numbers for one goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalGap {
    pub monthly_savings: f64,
    pub savings_rate_pct: f64,
    pub required_monthly_savings: f64,
    pub savings_gap: f64,
    pub months_to_goal: GoalPace,
}

impl GoalGap {
    pub fn on_track(&self) -> bool {
        self.savings_gap <= 0.0
    }
}

/// `target / horizon`
///
/// A zero horizon is an illegal input that callers must reject beforehand
/// (see [`GoalConfig::new`]); it is reported, never clamped.
pub fn required_monthly_savings(target_amount: f64, horizon_months: u32) -> Result<f64> {
    if horizon_months == 0 {
        return Err(Error::DivisionByZero(
            "goal horizon must be at least one month".into(),
        ));
    }
    Ok(target_amount / f64::from(horizon_months))
}

/// `max(0, income - spend)`
pub fn monthly_savings(monthly_income: f64, average_monthly_spend: f64) -> f64 {
    (monthly_income - average_monthly_spend).max(0.0)
}

/// Savings as a percentage of income, 0 when income is 0
pub fn savings_rate_pct(monthly_savings: f64, monthly_income: f64) -> f64 {
    if monthly_income > 0.0 {
        monthly_savings / monthly_income * 100.0
    } else {
        0.0
    }
}

/// `max(0, required - savings)`
pub fn savings_gap(required_monthly_savings: f64, monthly_savings: f64) -> f64 {
    (required_monthly_savings - monthly_savings).max(0.0)
}

pub fn months_to_goal(target_amount: f64, monthly_savings: f64) -> GoalPace {
    if monthly_savings > 0.0 {
        GoalPace::Reachable {
            months: target_amount / monthly_savings,
        }
    } else {
        GoalPace::Unreachable
    }
}

/// Compute every goal figure for a spend baseline
pub fn compute_goal_gap(goal: &GoalConfig, average_monthly_spend: f64) -> Result<GoalGap> {
    let required = required_monthly_savings(goal.target_amount, goal.horizon_months)?;
    let savings = monthly_savings(goal.monthly_income, average_monthly_spend);

    Ok(GoalGap {
        monthly_savings: savings,
        savings_rate_pct: savings_rate_pct(savings, goal.monthly_income),
        required_monthly_savings: required,
        savings_gap: savings_gap(required, savings),
        months_to_goal: months_to_goal(goal.target_amount, savings),
    })
}
