//! Goal onboarding
//!
//! Collects the savings goal one answer at a time. The state lives in an
//! [`Onboarding`] value owned by the caller and advanced with
//! [`Onboarding::answer`]; there is no hidden global session.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{GoalConfig, RawValue};
use crate::normalize::parse_amount;

/// Where the conversation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    GoalAmount,
    Months,
    Income,
    Complete,
}

/// Step-by-step collection of a [`GoalConfig`]
#[derive(Debug, Clone)]
pub struct Onboarding {
    step: OnboardingStep,
    target_amount: Option<f64>,
    horizon_months: Option<u32>,
    monthly_income: Option<f64>,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::GoalAmount,
            target_amount: None,
            horizon_months: None,
            monthly_income: None,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step == OnboardingStep::Complete
    }

    /// Question for the current step, `None` once complete
    pub fn prompt(&self) -> Option<&'static str> {
        match self.step {
            OnboardingStep::GoalAmount => Some("How much do you want to save? ($)"),
            OnboardingStep::Months => Some("In how many months?"),
            OnboardingStep::Income => Some("What is your monthly income? ($)"),
            OnboardingStep::Complete => None,
        }
    }

    /// Apply an answer to the current step
    ///
    /// On success the state advances and the new step is returned. Invalid
    /// answers return [`Error::InvalidInput`] and leave the step unchanged.
    pub fn answer(&mut self, input: &str) -> Result<OnboardingStep> {
        let input = input.trim();
        match self.step {
            OnboardingStep::GoalAmount => {
                let amount = parse_money(input)?;
                if amount <= 0.0 {
                    return Err(Error::InvalidInput(
                        "goal amount must be greater than zero".into(),
                    ));
                }
                self.target_amount = Some(amount);
                self.step = OnboardingStep::Months;
            }
            OnboardingStep::Months => {
                let months: u32 = input.parse().map_err(|_| {
                    Error::InvalidInput(format!("'{}' is not a whole number of months", input))
                })?;
                if months < 1 {
                    return Err(Error::InvalidInput(
                        "timeframe must be at least one month".into(),
                    ));
                }
                self.horizon_months = Some(months);
                self.step = OnboardingStep::Income;
            }
            OnboardingStep::Income => {
                let income = parse_money(input)?;
                if income < 0.0 {
                    return Err(Error::InvalidInput("income cannot be negative".into()));
                }
                self.monthly_income = Some(income);
                self.step = OnboardingStep::Complete;
            }
            OnboardingStep::Complete => {
                return Err(Error::InvalidInput("onboarding is already complete".into()));
            }
        }
        debug!(step = ?self.step, "Onboarding advanced");
        Ok(self.step)
    }

    /// The collected goal, once every step has been answered
    pub fn goal(&self) -> Option<GoalConfig> {
        match (self.target_amount, self.horizon_months, self.monthly_income) {
            (Some(target), Some(months), Some(income)) => {
                GoalConfig::new(target, months, income).ok()
            }
            _ => None,
        }
    }
}

fn parse_money(input: &str) -> Result<f64> {
    parse_amount(&RawValue::from(input))
        .ok_or_else(|| Error::InvalidInput(format!("'{}' is not an amount", input)))
}
