//! Incident triage API handlers
//!
//! This module provides HTTP endpoints for single-incident triage:
//! - POST /api/v1/incidents/triage - Classify, estimate, and prioritize one incident

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use causeway_core::IncidentRecord;

use crate::{ApiState, SuccessResponse};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Request to triage a single incident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRequest {
    /// Incident to assess
    pub incident: IncidentRecord,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/v1/incidents/triage
#[instrument(skip(state, request), fields(incident_id = %request.incident.id))]
pub async fn triage_incident(
    State(state): State<ApiState>,
    Json(request): Json<TriageRequest>,
) -> impl IntoResponse {
    info!(
        incident_id = %request.incident.id,
        "Processing triage request"
    );

    let assessment = state.triage.assess(&request.incident, Utc::now());

    (StatusCode::OK, Json(SuccessResponse::new(assessment)))
}
