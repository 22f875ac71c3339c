//! Shared error type for the Causeway crates.
//!
//! Analysis itself never fails on malformed incident fields; those decode to
//! documented defaults. Errors are reserved for contract violations and the
//! surrounding plumbing: configuration files, serialization, I/O.

use thiserror::Error;

/// Convenience alias used across all Causeway crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller violated an operation contract, e.g. a negative timeframe.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying I/O failure (config file, incidents file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration parse failure.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl Error {
    /// Build a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// True when the error is a caller contract violation rather than an
    /// internal failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
