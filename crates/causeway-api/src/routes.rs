//! API route definitions.
//!
//! This module defines all HTTP routes for the Causeway service:
//!
//! ## Analysis Endpoints
//! - `/api/v1/problems/analyze` - Recurring-problem analysis
//! - `/api/v1/problems/root-cause` - Root-cause analysis of one incident set
//! - `/api/v1/problems/config` - Engine configuration
//! - `/api/v1/problems/stats` - Analyzer statistics
//! - `/api/v1/incidents/triage` - Single-incident triage
//!
//! ## Infrastructure Endpoints
//! - `/health`, `/health/live`, `/health/ready` - Health checks

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use causeway_core::ServerConfig;

use crate::handlers::{health::*, problems::*, triage::*};
use crate::ApiState;

/// Create the service router.
pub fn create_router(config: &ServerConfig, state: ApiState) -> Router {
    // API v1 routes
    let api_v1 = Router::new()
        .route("/problems/analyze", post(analyze_problems))
        .route("/problems/root-cause", post(find_root_cause))
        .route("/problems/config", get(get_analysis_config))
        .route("/problems/stats", get(get_analysis_stats))
        .route("/incidents/triage", post(triage_incident))
        .with_state(state.clone());

    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .with_state(state);

    // Combine all routes
    let app = Router::new().nest("/api/v1", api_v1).merge(health_routes);

    let app = if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.layer(TimeoutLayer::new(Duration::from_secs(
        config.request_timeout_secs,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt; // for `oneshot`

    use causeway_engine::ProblemAnalyzer;

    fn test_app() -> Router {
        let config = ServerConfig::default();
        let state = ApiState::new(ProblemAnalyzer::with_defaults());
        create_router(&config, state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "causeway");
        assert!(json["version"].is_string());
        assert!(json["uptime_secs"].as_i64().unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_probe_endpoints() {
        for uri in ["/health/live", "/health/ready"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = test_app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_analyze_problems_endpoint() {
        let app = test_app();

        let body = serde_json::json!({
            "incidents": [
                {
                    "id": "INC-1",
                    "title": "Server down",
                    "description": "server down outage",
                    "severity": "high",
                    "affected_systems": ["payments"]
                },
                {
                    "id": "INC-2",
                    "title": "Server down",
                    "description": "server down outage",
                    "severity": "high",
                    "affected_systems": ["payments"]
                },
                {
                    "id": "INC-3",
                    "title": "Server down",
                    "description": "server down outage critical",
                    "severity": "critical",
                    "affected_systems": ["payments"]
                }
            ]
        });
        let response = app
            .oneshot(post_json("/api/v1/problems/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);

        let data = &json["data"];
        assert_eq!(data["total_incidents"], 3);
        assert_eq!(data["problem_groups"].as_array().unwrap().len(), 1);
        assert_eq!(data["problem_groups"][0]["group_id"], "GRP-1");
        assert_eq!(data["problem_groups"][0]["incident_count"], 3);
        assert_eq!(data["timeframe_days"], 30);
        assert!(data["metadata"]["inputs_hash"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_rejects_negative_timeframe() {
        let app = test_app();

        let body = serde_json::json!({ "incidents": [], "timeframe_days": -1 });
        let response = app
            .oneshot(post_json("/api/v1/problems/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Invalid argument: timeframe_days must be non-negative, got -1"
        );
    }

    #[tokio::test]
    async fn test_root_cause_endpoint() {
        let app = test_app();

        let body = serde_json::json!({
            "incidents": [
                {
                    "id": "INC-1",
                    "title": "Checkout latency",
                    "description": "checkout slow",
                    "severity": "high",
                    "affected_systems": ["checkout"],
                    "created_at": "2024-03-01T10:00:00Z"
                },
                {
                    "id": "INC-2",
                    "title": "Checkout errors",
                    "description": "checkout failing",
                    "severity": "high",
                    "affected_systems": ["checkout"],
                    "created_at": "2024-03-01T10:30:00Z"
                }
            ]
        });
        let response = app
            .oneshot(post_json("/api/v1/problems/root-cause", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);

        let data = &json["data"];
        assert_eq!(data["incident_count"], 2);
        // Half an hour apart is well inside the burst window.
        assert_eq!(data["timeline_analysis"]["pattern_type"], "burst");
        assert!(!data["ranked_causes"].as_array().unwrap().is_empty());
        assert!(data["confidence_score"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_triage_endpoint() {
        let app = test_app();

        let body = serde_json::json!({
            "incident": {
                "id": "INC-42",
                "title": "Server down",
                "description": "Primary API server unreachable",
                "severity": "critical",
                "affected_systems": ["api-1", "api-2"]
            }
        });
        let response = app
            .oneshot(post_json("/api/v1/incidents/triage", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);

        let data = &json["data"];
        assert_eq!(data["incident_id"], "INC-42");
        assert_eq!(data["category"], "application");
        assert_eq!(data["priority_score"], 12);
        assert_eq!(data["escalation_required"], true);
    }

    #[tokio::test]
    async fn test_config_endpoint() {
        let app = test_app();

        let request = Request::builder()
            .uri("/api/v1/problems/config")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["similarity_threshold"], 0.7);
        assert_eq!(json["data"]["min_group_size"], 3);
        assert_eq!(json["data"]["default_timeframe_days"], 30);
    }

    #[tokio::test]
    async fn test_stats_endpoint_counts_requests() {
        let app = test_app();

        let body = serde_json::json!({ "incidents": [] });
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/problems/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/api/v1/problems/stats")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["problem_analyses"], 1);
        assert_eq!(json["data"]["root_cause_analyses"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app();

        let request = Request::builder()
            .uri("/api/v1/nope")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
