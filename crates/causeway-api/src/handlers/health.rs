//! Health check API handlers
//!
//! This module provides the service health endpoints:
//! - GET /health - Service status, version, and uptime
//! - GET /health/live - Liveness probe
//! - GET /health/ready - Readiness probe

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ApiState;

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Health status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" while the server answers
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since the server state was created
    pub uptime_secs: i64,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// GET /health
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: "causeway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    };

    (StatusCode::OK, Json(response))
}

/// GET /health/live
///
/// The process answering at all is the liveness signal.
pub async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /health/ready
///
/// The analyzer has no external dependencies to wait on, so readiness
/// matches liveness.
pub async fn readiness() -> impl IntoResponse {
    StatusCode::OK
}
