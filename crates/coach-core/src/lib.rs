//! Coach Core Library
//!
//! Shared functionality for the Coach personal finance tool:
//! - Column normalizer for transaction exports with unknown column naming
//! - Windowed spending aggregation and monthly baseline
//! - Recurring and gray-charge detection
//! - Goal-gap calculator
//! - CSV/JSON dataset loaders
//! - Persona library and report prompt assembler
//! - Onboarding state machine for chat-style goal collection

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod goal;
pub mod import;
pub mod models;
pub mod normalize;
pub mod onboarding;
pub mod personas;
pub mod recurring;
pub mod report;

/// Fixture builders for datasets and transactions
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{analyze, SpendingAnalyzer};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use models::{
    AnalysisSummary, BaselineMethod, CategoryTotal, ColumnRole, GoalConfig, GoalPace, MonthTotal,
    RawDataset, RawValue, RecurringCharge, Transaction,
};
pub use normalize::{normalize, resolve_columns, ColumnMapping};
pub use onboarding::{Onboarding, OnboardingStep};
pub use personas::{Persona, PersonaLibrary};
pub use report::{ReportContext, ReportPrompt};
