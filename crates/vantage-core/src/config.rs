//! Analytics configuration
//!
//! Holds the category allow-lists and the empirically chosen thresholds
//! that are kept tunable for later calibration.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/vantage/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Share of the previous month below which the latest month looks partial
pub const DEFAULT_PARTIAL_MONTH_RATIO: f64 = 0.3;

/// Slope-to-mean-absolute-diff ratio that counts as acceleration
pub const DEFAULT_ACCELERATION_RATIO: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Category names that count as investment holdings
    pub investment_categories: Vec<String>,
    /// Bucket for expenses without a category
    pub uncategorized_label: String,
    /// Bucket for liabilities without a category
    pub other_liability_label: String,
    pub partial_month_ratio: f64,
    pub acceleration_ratio: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            investment_categories: [
                "Stocks",
                "Investment trusts",
                "Bonds",
                "FX",
                "Futures",
                "Crypto, FX & precious metals",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            uncategorized_label: "Uncategorized".to_string(),
            other_liability_label: "Other".to_string(),
            partial_month_ratio: DEFAULT_PARTIAL_MONTH_RATIO,
            acceleration_ratio: DEFAULT_ACCELERATION_RATIO,
        }
    }
}

impl AnalyticsConfig {
    /// Load from the default override location, else the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if it does not exist)
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content, layered over the built-in defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(categories) = raw.categories {
            if let Some(investment) = categories.investment {
                config.investment_categories = investment;
            }
            if let Some(label) = categories.uncategorized {
                config.uncategorized_label = label;
            }
            if let Some(label) = categories.other_liability {
                config.other_liability_label = label;
            }
        }

        if let Some(thresholds) = raw.thresholds {
            if let Some(ratio) = thresholds.partial_month_ratio {
                config.partial_month_ratio = ratio;
            }
            if let Some(ratio) = thresholds.acceleration_ratio {
                config.acceleration_ratio = ratio;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("partial_month_ratio", self.partial_month_ratio),
            ("acceleration_ratio", self.acceleration_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }

    /// Whether a holding category counts as an investment
    ///
    /// Matches by substring in either direction; an empty name never matches.
    pub fn is_investment_category(&self, category_name: &str) -> bool {
        if category_name.is_empty() {
            return false;
        }
        self.investment_categories
            .iter()
            .any(|c| category_name.contains(c.as_str()) || c.contains(category_name))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("vantage").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading analytics config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    AnalyticsConfig::parse(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    categories: Option<RawCategories>,
    thresholds: Option<RawThresholds>,
}

#[derive(Debug, Deserialize)]
struct RawCategories {
    investment: Option<Vec<String>>,
    uncategorized: Option<String>,
    other_liability: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    partial_month_ratio: Option<f64>,
    acceleration_ratio: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = AnalyticsConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = AnalyticsConfig::parse(
            r#"
            [thresholds]
            acceleration_ratio = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.acceleration_ratio, 0.5);
        assert_eq!(config.partial_month_ratio, DEFAULT_PARTIAL_MONTH_RATIO);
        assert_eq!(config.uncategorized_label, "Uncategorized");
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let result = AnalyticsConfig::parse(
            r#"
            [thresholds]
            partial_month_ratio = -1.0
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        assert!(AnalyticsConfig::parse("[categories").is_err());
    }

    #[test]
    fn test_from_path_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[categories]\ninvestment = [\"Pension\"]").unwrap();

        let config = AnalyticsConfig::from_path(file.path()).unwrap();
        assert_eq!(config.investment_categories, vec!["Pension".to_string()]);
    }

    #[test]
    fn test_from_missing_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyticsConfig::from_path(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_investment_category_matching() {
        let config = AnalyticsConfig::default();
        assert!(config.is_investment_category("Stocks"));
        // Source name contains an allow-list entry
        assert!(config.is_investment_category("Stocks (spot)"));
        // Allow-list entry contains the source name
        assert!(config.is_investment_category("Bond"));
        assert!(!config.is_investment_category("Cash"));
        assert!(!config.is_investment_category(""));
    }
}
