//! Analysis configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/coach/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Tuning knobs for the analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Length of the analysis window ending at "now", in days
    pub window_days: u32,
    /// How many categories `top_categories` keeps
    pub top_categories: usize,
    /// Gray-charge threshold as a fraction of monthly income
    pub gray_charge_fraction: f64,
    /// Single transactions above this amount are flagged as large
    pub large_charge_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: 60,
            top_categories: 3,
            gray_charge_fraction: 0.05,
            large_charge_threshold: 100.0,
        }
    }
}

impl AnalysisConfig {
    /// Load from the default override location, falling back to embedded defaults
    ///
    /// A broken override is logged and ignored; use [`AnalysisConfig::from_path`]
    /// to get the error instead.
    pub fn load() -> Result<Self> {
        match load_config(None) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid analysis config override");
                parse_config(DEFAULT_CONFIG)
            }
        }
    }

    /// Load from an explicit path; a missing file falls back to embedded defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Same config with a different window length
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(Error::InvalidData("window_days must be at least 1".into()));
        }
        if !self.gray_charge_fraction.is_finite() || self.gray_charge_fraction < 0.0 {
            return Err(Error::InvalidData(format!(
                "gray_charge_fraction must be zero or more, got {}",
                self.gray_charge_fraction
            )));
        }
        if !self.large_charge_threshold.is_finite() || self.large_charge_threshold < 0.0 {
            return Err(Error::InvalidData(format!(
                "large_charge_threshold must be zero or more, got {}",
                self.large_charge_threshold
            )));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("coach").join("config").join("analysis.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading analysis config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    window_days: Option<u32>,
    top_categories: Option<usize>,
    gray_charge_fraction: Option<f64>,
    large_charge_threshold: Option<f64>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(analysis) = raw.analysis {
        if let Some(window_days) = analysis.window_days {
            config.window_days = window_days;
        }
        if let Some(top) = analysis.top_categories {
            config.top_categories = top;
        }
        if let Some(fraction) = analysis.gray_charge_fraction {
            config.gray_charge_fraction = fraction;
        }
        if let Some(threshold) = analysis.large_charge_threshold {
            config.large_charge_threshold = threshold;
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_default_matches_default() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config("[analysis]\nwindow_days = 90\n").unwrap();
        assert_eq!(config.window_days, 90);
        assert_eq!(config.top_categories, 3);
        assert_eq!(config.gray_charge_fraction, 0.05);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config("[analysis]\nwindow_days = 0\n").is_err());
        assert!(parse_config("[analysis]\ngray_charge_fraction = -0.1\n").is_err());
        assert!(parse_config("[analysis]\nwindow_days = \"sixty\"\n").is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ntop_categories = 5").unwrap();
        let config = AnalysisConfig::from_path(file.path()).unwrap();
        assert_eq!(config.top_categories, 5);

        let missing = file.path().with_extension("missing");
        assert_eq!(
            AnalysisConfig::from_path(&missing).unwrap(),
            AnalysisConfig::default()
        );
    }

    #[test]
    fn test_with_window_days() {
        let config = AnalysisConfig::default().with_window_days(90);
        assert_eq!(config.window_days, 90);
    }
}
