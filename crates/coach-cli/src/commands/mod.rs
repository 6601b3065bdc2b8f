//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, dataset and goal loading, analysis)
//! - `analyze` - Spending summary against a goal
//! - `columns` - Column detection report
//! - `onboard` - Interactive goal setup
//! - `personas` - Persona listing
//! - `prompt` - Report prompt rendering

pub mod analyze;
pub mod columns;
pub mod core;
pub mod onboard;
pub mod personas;
pub mod prompt;

// Re-export command functions for main.rs
pub use analyze::*;
pub use columns::*;
pub use core::*;
pub use onboard::*;
pub use personas::*;
pub use prompt::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
