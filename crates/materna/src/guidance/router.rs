use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::normalize::PatientSnapshot;
use super::service::GuidanceService;

/// Router builder exposing the guidance endpoints for both intake
/// shapes.
pub fn guidance_router(service: Arc<GuidanceService>) -> Router {
    Router::new()
        .route("/api/v1/guidance/triage", post(triage_handler))
        .route("/api/v1/guidance/assessment", post(assessment_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TriageRequest {
    pub(crate) message: String,
}

pub(crate) async fn triage_handler(
    State(service): State<Arc<GuidanceService>>,
    axum::Json(request): axum::Json<TriageRequest>,
) -> Response {
    let report = service.triage(&request.message, Utc::now());
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn assessment_handler(
    State(service): State<Arc<GuidanceService>>,
    axum::Json(snapshot): axum::Json<PatientSnapshot>,
) -> Response {
    match service.assess(&snapshot, Utc::now()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
