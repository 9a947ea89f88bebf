use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use super::domain::EligibilityReport;
use super::profile::UserProfile;
use super::service::{LookupError, SchemeService};

/// Router exposing the eligibility check and roadmap lookup.
pub fn eligibility_router(service: Arc<SchemeService>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/check-eligibility", post(check_eligibility_handler))
        .route("/roadmap/:scheme_id", get(roadmap_handler))
        .with_state(service)
}

pub(crate) async fn home_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Kerala Scheme Eligibility API Running 🚀" }))
}

pub(crate) async fn check_eligibility_handler(
    State(service): State<Arc<SchemeService>>,
    Json(profile): Json<UserProfile>,
) -> Json<EligibilityReport> {
    let report = service.find_eligible(&profile);
    info!(
        total_eligible = report.total_eligible,
        catalog = service.catalog().len(),
        "eligibility check completed"
    );
    Json(report)
}

pub(crate) async fn roadmap_handler(
    State(service): State<Arc<SchemeService>>,
    Path(scheme_id): Path<String>,
) -> Response {
    match service.roadmap(&scheme_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(LookupError::NotFound(id)) => {
            info!(scheme = %id, "roadmap requested for unknown scheme");
            let payload = json!({ "detail": "Scheme not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}
