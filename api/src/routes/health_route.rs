//! GET /health: liveness plus a probe of the text-generation backend.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

/// Always 200 while the server runs; `data.ok` reports the backend.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let status: HealthStatus = state.generator.health().await;
    ApiResponse::success(status).into_response_with_status(StatusCode::OK)
}
