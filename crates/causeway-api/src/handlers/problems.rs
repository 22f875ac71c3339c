//! Problem analysis API handlers
//!
//! This module provides HTTP endpoints for the correlation engine:
//! - POST /api/v1/problems/analyze - Recurring-problem analysis over a batch
//! - POST /api/v1/problems/root-cause - Root-cause analysis of one incident set
//! - GET /api/v1/problems/config - Get engine configuration
//! - GET /api/v1/problems/stats - Get analyzer statistics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use causeway_core::IncidentRecord;

use crate::{error_response, ApiState, SuccessResponse};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Request for recurring-problem analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeProblemsRequest {
    /// Incidents to correlate
    pub incidents: Vec<IncidentRecord>,
    /// Lookback window override (days)
    #[serde(default)]
    pub timeframe_days: Option<i64>,
}

/// Request for root-cause analysis of incidents already known to be related
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCauseRequest {
    /// Incident set to analyze as one event
    pub incidents: Vec<IncidentRecord>,
}

/// Engine configuration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfigResponse {
    /// Jaccard threshold for grouping
    pub similarity_threshold: f64,
    /// Minimum incidents per group
    pub min_group_size: usize,
    /// Default lookback window (days)
    pub default_timeframe_days: i64,
    /// Recurring-pattern interval ceiling (hours)
    pub recurring_threshold_hours: f64,
    /// Burst detection gap ceiling (hours)
    pub burst_window_hours: f64,
    /// Symptoms reported per group
    pub max_common_symptoms: usize,
    /// Systems reported per batch
    pub max_common_systems: usize,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/v1/problems/analyze
#[instrument(skip(state, request), fields(incident_count = request.incidents.len()))]
pub async fn analyze_problems(
    State(state): State<ApiState>,
    Json(request): Json<AnalyzeProblemsRequest>,
) -> Response {
    info!(
        incident_count = request.incidents.len(),
        "Processing problem analysis request"
    );

    match state
        .analyzer
        .analyze_recurring_problems(&request.incidents, request.timeframe_days)
    {
        Ok(analysis) => (StatusCode::OK, Json(SuccessResponse::new(analysis))).into_response(),
        Err(error) => error_response(&error).into_response(),
    }
}

/// POST /api/v1/problems/root-cause
#[instrument(skip(state, request), fields(incident_count = request.incidents.len()))]
pub async fn find_root_cause(
    State(state): State<ApiState>,
    Json(request): Json<RootCauseRequest>,
) -> impl IntoResponse {
    info!(
        incident_count = request.incidents.len(),
        "Processing root cause analysis request"
    );

    let analysis = state.analyzer.find_root_cause(&request.incidents);

    (StatusCode::OK, Json(SuccessResponse::new(analysis)))
}

/// GET /api/v1/problems/config
#[instrument(skip(state))]
pub async fn get_analysis_config(State(state): State<ApiState>) -> impl IntoResponse {
    info!("Getting analysis configuration");

    let settings = state.analyzer.settings();
    let response = AnalysisConfigResponse {
        similarity_threshold: settings.similarity_threshold,
        min_group_size: settings.min_group_size,
        default_timeframe_days: settings.default_timeframe_days,
        recurring_threshold_hours: settings.recurring_threshold_hours,
        burst_window_hours: settings.burst_window_hours,
        max_common_symptoms: settings.max_common_symptoms,
        max_common_systems: settings.max_common_systems,
    };

    (StatusCode::OK, Json(SuccessResponse::new(response)))
}

/// GET /api/v1/problems/stats
#[instrument(skip(state))]
pub async fn get_analysis_stats(State(state): State<ApiState>) -> impl IntoResponse {
    info!("Getting analyzer statistics");

    let stats = state.analyzer.stats();

    (StatusCode::OK, Json(SuccessResponse::new(stats)))
}
