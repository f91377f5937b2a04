//! Health check endpoint
//!
//! Always answers 200; a degraded service reports its missing credential
//! through `api_key_status` rather than through the status code.

use axum::{Json, extract::State, http::StatusCode};

use crate::handlers::AppState;
use crate::types::HealthStatus;

/// GET /api/health handler
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(state.service().health()))
}
