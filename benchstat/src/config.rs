//! Configuration loading for benchstat.
//!
//! Supports loading analysis settings from TOML files, with every policy
//! value (significance level, effect-size guard, fit acceptance) defaulted in
//! one visible place.

use anyhow::{Context, Result};
use benchstat_core::{ComparisonSettings, FitSettings, OutlierPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for benchstat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for before/after regression comparison.
    pub comparison: ComparisonSettings,
    /// Settings for complexity fitting.
    pub complexity: ComplexityConfig,
}

/// Configuration for complexity analysis of scaled benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityConfig {
    /// Minimum number of distinct variable values required for a fit.
    pub min_points: usize,
    /// R² margin within which the simpler model wins.
    pub tie_epsilon: f64,
    /// Fits scoring below this R² are reported as unknown.
    pub minimum_r_squared: f64,
    /// Outlier handling applied to each case before taking its mean.
    pub outlier_policy: OutlierPolicy,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        let fit = FitSettings::default();
        Self {
            min_points: fit.min_points,
            tie_epsilon: fit.tie_epsilon,
            minimum_r_squared: fit.minimum_r_squared,
            outlier_policy: OutlierPolicy::None,
        }
    }
}

impl ComplexityConfig {
    /// The fitter settings this section describes.
    pub fn fit_settings(&self) -> FitSettings {
        FitSettings {
            min_points: self.min_points,
            tie_epsilon: self.tie_epsilon,
            minimum_r_squared: self.minimum_r_squared,
        }
    }
}

/// Default configuration file name.
const DEFAULT_CONFIG_FILE: &str = ".benchstat.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it holds
    /// settings the analyses would reject.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `.benchstat.toml` in the current directory, or use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or fall back to
    /// [`Config::load_or_default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the specified file cannot be read or parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }

    /// Check every section against the rules the analyses enforce.
    pub fn validate(&self) -> Result<()> {
        self.comparison
            .validate()
            .context("Invalid [comparison] settings")?;
        self.complexity
            .fit_settings()
            .validate()
            .context("Invalid [complexity] settings")?;
        self.complexity
            .outlier_policy
            .validate()
            .context("Invalid [complexity] outlier policy")?;
        Ok(())
    }
}
