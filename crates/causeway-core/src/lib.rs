//! Causeway shared contract types.
//!
//! Foundation crate for the Causeway incident analysis engine:
//! - `incident`: the `IncidentRecord` input model with lenient decoding
//! - `config`: application and analysis configuration
//! - `error`: the shared error type
//!
//! Analysis logic lives in `causeway-engine`; this crate only defines the
//! contract the engine and its callers share.

pub mod config;
pub mod error;
pub mod incident;

pub use config::{AnalysisSettings, Config, LoggingConfig, ServerConfig};
pub use error::{Error, Result};
pub use incident::{IncidentRecord, Severity};
