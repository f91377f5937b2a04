//! Integration tests for /api/health

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt;
use weather_chat::{
    config::{ProviderConfig, ProviderKind},
    error::ProviderError,
    handlers::{self, AppState},
    providers::LlmProvider,
    service::ChatService,
    types::{ApiKeyStatus, HealthStatus},
};

struct ReadyProvider;

#[async_trait]
impl LlmProvider for ReadyProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        "gpt-4o-mini"
    }

    async fn generate(&self, _message: &str) -> Result<String, ProviderError> {
        Ok("ok".to_string())
    }
}

async fn get_health(app: Router) -> (StatusCode, HealthStatus) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (
        status,
        serde_json::from_slice(&body).expect("health body should be valid JSON"),
    )
}

#[tokio::test]
async fn test_health_reports_configured_key() {
    let app = handlers::router(AppState::new(ChatService::new(Arc::new(ReadyProvider))));

    let (status, health) = get_health(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "Weather Chatbot API");
    assert_eq!(health.llm_integration, "OpenAI GPT");
    assert_eq!(health.api_key_status, ApiKeyStatus::Configured);
    assert_eq!(health.model, "gpt-4o-mini");
    assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
}

#[tokio::test]
async fn test_health_reports_missing_key_but_stays_ok() {
    let config = ProviderConfig::for_kind(ProviderKind::Gemini);
    let service = ChatService::from_config(&config, None);
    let app = handlers::router(AppState::new(service));

    let (status, health) = get_health(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.llm_integration, "Google Gemini");
    assert_eq!(health.api_key_status, ApiKeyStatus::NotConfigured);
    assert_eq!(health.model, "gemini-1.5-flash");
}

#[tokio::test]
async fn test_health_wire_format() {
    let app = handlers::router(AppState::new(ChatService::uninitialized(
        ProviderKind::OpenAi,
        "gpt-4o-mini",
    )));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["api_key_status"], "not configured");
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_rejects_post() {
    let app = handlers::router(AppState::new(ChatService::new(Arc::new(ReadyProvider))));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
