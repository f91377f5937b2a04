//! HTTP request handlers for the chat API

use crate::middleware::request_id_middleware;
use crate::service::ChatService;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod health;

/// Application state shared across all handlers
///
/// The service is immutable after startup; cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    service: Arc<ChatService>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(service: ChatService) -> Self {
        Self {
            service: Arc::new(service),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Bound every request to `timeout`; slower requests get a 408
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Get reference to the chat service
    pub fn service(&self) -> &ChatService {
        &self.service
    }
}

/// Build the Axum router with all routes and middleware
///
/// Both endpoints accept cross-origin requests from any origin. The
/// request-id layer wraps CORS so preflight answers carry an id too.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat::handler))
        .route("/api/health", get(health::handler))
        .layer(TimeoutLayer::new(state.request_timeout()))
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[test]
    fn test_appstate_is_clonable() {
        let state = AppState::new(ChatService::uninitialized(
            ProviderKind::OpenAi,
            "gpt-4o-mini",
        ));
        let state2 = state.clone();
        assert!(Arc::ptr_eq(&state.service, &state2.service));
        assert_eq!(state2.service().model(), "gpt-4o-mini");
        assert_eq!(state2.request_timeout(), Duration::from_secs(60));
    }
}
