use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::table::{GuidanceEntry, GuidanceTable};

/// Body of `POST /analyze-form`. The screenshot and user data are accepted for wire
/// compatibility but play no part in the lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct FormAnalysisRequest {
    pub scheme_id: String,
    #[serde(default)]
    pub screenshot: String,
    pub current_step: i64,
    #[serde(default)]
    pub user_data: Map<String, Value>,
}

/// Router for the form filling agent.
pub fn agent_router(table: Arc<GuidanceTable>) -> Router {
    Router::new()
        .route("/", get(agent_home_handler))
        .route("/analyze-form", post(analyze_form_handler))
        .with_state(table)
}

pub(crate) async fn agent_home_handler() -> Json<Value> {
    Json(json!({ "message": "Form Filling Agent API Running 🤖" }))
}

pub(crate) async fn analyze_form_handler(
    State(table): State<Arc<GuidanceTable>>,
    Json(request): Json<FormAnalysisRequest>,
) -> Json<GuidanceEntry> {
    debug!(
        scheme = %request.scheme_id,
        step = request.current_step,
        screenshot_bytes = request.screenshot.len(),
        user_fields = request.user_data.len(),
        "form analysis requested"
    );
    Json(table.guidance(&request.scheme_id, request.current_step))
}
