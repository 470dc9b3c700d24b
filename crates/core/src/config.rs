//! Runtime configuration for the decision pipeline.
//!
//! Every knob has a default matching the shipped behavior, so an empty TOML
//! document yields a fully working configuration. Loaded configs are
//! validated before use.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ConfigError;

/// Complexity thresholds for the query router.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Complexity at or above this routes to SMART.
    pub smart_threshold: f64,
    /// Complexity at or above this routes to DEEP.
    pub deep_threshold: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { smart_threshold: 0.3, deep_threshold: 0.7 }
    }
}

/// Penalties and reference values for the feasibility gate.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Rating threshold used when the preference profile carries none.
    pub default_min_rating: f64,
    /// Soft penalty for a rating below the threshold.
    pub low_rating_penalty: f64,
    /// Soft penalty for a condition outside the preferred set.
    pub condition_penalty: f64,
    /// Scale for the disfavored-brand penalty: scale * (1 - brand_score).
    pub brand_penalty_scale: f64,
    /// Total soft penalty is capped here before being applied.
    pub penalty_cap: f64,
    /// Reference price for the price-efficiency curve, in whole currency
    /// units: efficiency = clamp(1 - price/reference, 0.2, 1.0).
    pub price_reference: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            default_min_rating: 3.5,
            low_rating_penalty: 0.15,
            condition_penalty: 0.20,
            brand_penalty_scale: 0.10,
            penalty_cap: 0.5,
            price_reference: 2000.0,
        }
    }
}

/// Limits for the bundle optimizer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Exact solve is attempted only at or below this candidate count.
    pub max_exact_candidates: usize,
    /// Internal wall-clock limit for the exact solve, in milliseconds.
    /// A caller-supplied deadline can only shorten it.
    pub exact_time_limit_ms: u64,
    /// Item cap applied when the caller passes none.
    pub default_max_items: usize,
    /// Utilities are scaled to this integer domain for solver precision.
    pub utility_scale: i64,
    /// Categories limited to one selected item per bundle.
    pub single_item_categories: HashSet<String>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_exact_candidates: 15,
            exact_time_limit_ms: 500,
            default_max_items: 5,
            utility_scale: 1000,
            single_item_categories: ["laptop", "desktop", "computer", "phone", "tablet", "desk", "chair", "sofa"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl OptimizerConfig {
    pub fn exact_time_limit(&self) -> Duration {
        Duration::from_millis(self.exact_time_limit_ms)
    }
}

/// Aggregate configuration for the four pipeline components.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub router: RouterConfig,
    pub gate: GateConfig,
    pub optimizer: OptimizerConfig,
}

impl CoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.router.smart_threshold)
            || !unit.contains(&self.router.deep_threshold)
        {
            return Err(ConfigError::Invalid("router thresholds must lie in 0..=1".to_owned()));
        }
        if self.router.smart_threshold >= self.router.deep_threshold {
            return Err(ConfigError::Invalid(
                "router smart_threshold must be below deep_threshold".to_owned(),
            ));
        }
        if self.gate.penalty_cap <= 0.0 || self.gate.penalty_cap > 1.0 {
            return Err(ConfigError::Invalid("gate penalty_cap must lie in (0, 1]".to_owned()));
        }
        if self.gate.price_reference <= 0.0 {
            return Err(ConfigError::Invalid("gate price_reference must be positive".to_owned()));
        }
        if self.optimizer.max_exact_candidates == 0 {
            return Err(ConfigError::Invalid(
                "optimizer max_exact_candidates must be at least 1".to_owned(),
            ));
        }
        if self.optimizer.exact_time_limit_ms == 0 {
            return Err(ConfigError::Invalid(
                "optimizer exact_time_limit_ms must be positive".to_owned(),
            ));
        }
        if self.optimizer.utility_scale <= 0 {
            return Err(ConfigError::Invalid(
                "optimizer utility_scale must be positive".to_owned(),
            ));
        }
        if self.optimizer.default_max_items == 0 {
            return Err(ConfigError::Invalid(
                "optimizer default_max_items must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
