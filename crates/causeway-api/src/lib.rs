//! Causeway HTTP API.
//!
//! Exposes the analysis engine over HTTP:
//!
//! ## Analysis endpoints
//! - `POST /api/v1/problems/analyze` - recurring-problem analysis
//! - `POST /api/v1/problems/root-cause` - whole-batch root-cause analysis
//! - `GET /api/v1/problems/config` - engine configuration
//! - `GET /api/v1/problems/stats` - analyzer counters
//! - `POST /api/v1/incidents/triage` - single-incident triage
//!
//! ## Infrastructure endpoints
//! - `/health`, `/health/live`, `/health/ready` - health checks

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use causeway_core::Error;
use causeway_engine::{IncidentTriage, ProblemAnalyzer};

pub use routes::create_router;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub analyzer: Arc<ProblemAnalyzer>,
    pub triage: Arc<IncidentTriage>,
    pub started_at: DateTime<Utc>,
}

impl ApiState {
    pub fn new(analyzer: ProblemAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            triage: Arc::new(IncidentTriage::new()),
            started_at: Utc::now(),
        }
    }
}

/// Standard success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Standard error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Map an engine error to a status code and error envelope.
///
/// Invalid arguments are the caller's fault; everything else is ours.
pub fn error_response(error: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = if error.is_invalid_argument() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(error.to_string())))
}
