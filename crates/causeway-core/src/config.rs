//! Application configuration.
//!
//! Loaded from a YAML file (default `config/causeway.yaml`). Every field has
//! a serde default, so a partial file or a missing section still yields a
//! runnable configuration; `validate` catches values that would break the
//! analysis pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default similarity threshold for clustering.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Default minimum incidents per problem group.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 3;

/// Default lookback window in days.
pub const DEFAULT_TIMEFRAME_DAYS: i64 = 30;

/// Mean inter-arrival below this many hours is a recurring pattern (one week).
pub const DEFAULT_RECURRING_THRESHOLD_HOURS: f64 = 168.0;

/// Maximum gap between consecutive incidents in a burst timeline.
pub const DEFAULT_BURST_WINDOW_HOURS: f64 = 24.0;

/// How many top symptom tokens a group reports.
pub const DEFAULT_MAX_COMMON_SYMPTOMS: usize = 5;

/// How many top systems a whole-batch analysis reports.
pub const DEFAULT_MAX_COMMON_SYSTEMS: usize = 3;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub analysis: AnalysisSettings,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.analysis.validate()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Allow cross-origin requests.
    pub enable_cors: bool,
}

impl ServerConfig {
    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::config("server.host must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config("server.request_timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            enable_cors: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter directive (e.g. `info`, `causeway_engine=debug`).
    pub level: String,
    /// Emit logs as JSON.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Jaccard similarity at or above which an anchor claims an incident.
    pub similarity_threshold: f64,
    /// Minimum members before a candidate group is kept.
    pub min_group_size: usize,
    /// Lookback window when the caller does not specify one.
    pub default_timeframe_days: i64,
    /// Mean inter-arrival below this many hours is a recurring pattern.
    pub recurring_threshold_hours: f64,
    /// Maximum gap between consecutive incidents in a burst timeline.
    pub burst_window_hours: f64,
    /// How many top symptom tokens a group reports.
    pub max_common_symptoms: usize,
    /// How many top systems a whole-batch analysis reports.
    pub max_common_systems: usize,
}

impl AnalysisSettings {
    /// Validate tunables; the engine refuses to construct with bad values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::config(format!(
                "analysis.similarity_threshold must be within [0.0, 1.0], got {}",
                self.similarity_threshold
            )));
        }
        if self.min_group_size == 0 {
            return Err(Error::config("analysis.min_group_size must be at least 1"));
        }
        if self.default_timeframe_days < 0 {
            return Err(Error::config(format!(
                "analysis.default_timeframe_days must be non-negative, got {}",
                self.default_timeframe_days
            )));
        }
        if self.recurring_threshold_hours <= 0.0 {
            return Err(Error::config(
                "analysis.recurring_threshold_hours must be positive",
            ));
        }
        if self.burst_window_hours <= 0.0 {
            return Err(Error::config("analysis.burst_window_hours must be positive"));
        }
        if self.max_common_symptoms == 0 {
            return Err(Error::config("analysis.max_common_symptoms must be at least 1"));
        }
        if self.max_common_systems == 0 {
            return Err(Error::config("analysis.max_common_systems must be at least 1"));
        }
        Ok(())
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            default_timeframe_days: DEFAULT_TIMEFRAME_DAYS,
            recurring_threshold_hours: DEFAULT_RECURRING_THRESHOLD_HOURS,
            burst_window_hours: DEFAULT_BURST_WINDOW_HOURS,
            max_common_symptoms: DEFAULT_MAX_COMMON_SYMPTOMS,
            max_common_systems: DEFAULT_MAX_COMMON_SYSTEMS,
        }
    }
}
