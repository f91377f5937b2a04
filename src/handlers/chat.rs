//! Chat endpoint handler
//!
//! Handles POST /api/chat. The body is taken as raw bytes so that a
//! malformed body is reported as a server error (500) rather than Axum's
//! own JSON rejection, while a blank message stays a 400.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::types::ChatResponse;
use axum::{Extension, Json, body::Bytes, extract::State};

/// POST /api/chat handler
///
/// Latency is dominated by the upstream provider call, which is bounded by
/// `provider.timeout_seconds`.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    tracing::debug!(
        request_id = %request_id,
        body_length = body.len(),
        "Received chat request"
    );

    let response = state
        .service()
        .handle_chat(request_id, &body)
        .await
        .inspect_err(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Chat request failed");
        })?;

    Ok(Json(response))
}
