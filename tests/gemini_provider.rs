//! Gemini provider wire contract, verified against a wiremock server

use serde_json::json;
use weather_chat::{
    config::{ProviderConfig, ProviderKind},
    error::ProviderError,
    providers::build_provider,
    service::ChatService,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

fn provider_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::for_kind(ProviderKind::Gemini).with_base_url(format!("{}/v1beta", server.uri()))
}

#[tokio::test]
async fn test_generate_sends_single_prompt_with_key_in_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "gemini-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [{
                    "text": "You are a helpful weather assistant. Answer this question concisely: Fog in London?"
                }]
            }],
            "generationConfig": { "temperature": 0.7 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Likely, " }, { "text": "in the morning.  " }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = build_provider(&provider_config(&server), Some("gemini-key".to_string()))
        .expect("provider should build");

    let answer = provider.generate("Fog in London?").await.unwrap();
    assert_eq!(answer, "Likely, in the morning.");
}

#[tokio::test]
async fn test_configured_temperature_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(body_partial_json(json!({ "generationConfig": { "temperature": 0.2 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Clear skies." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = provider_config(&server);
    config.temperature = 0.2;
    let provider = build_provider(&config, Some("k".to_string())).unwrap();

    assert_eq!(provider.generate("Tonight?").await.unwrap(), "Clear skies.");
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let provider = build_provider(&provider_config(&server), Some("k".to_string())).unwrap();
    let err = provider.generate("hi").await.unwrap_err();

    assert!(matches!(err, ProviderError::EmptyResponse { provider: "gemini" }));
}

#[tokio::test]
async fn test_quota_error_reported_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .mount(&server)
        .await;

    let provider = build_provider(&provider_config(&server), Some("k".to_string())).unwrap();
    let err = provider.generate("hi").await.unwrap_err();

    assert!(matches!(err, ProviderError::Status { status: 429, .. }));
}

#[tokio::test]
async fn test_service_falls_back_with_gemini_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = ChatService::from_config(&provider_config(&server), Some("k".to_string()));
    let response = service
        .handle_chat(
            weather_chat::middleware::RequestId::new(),
            br#"{"message": "Hail?"}"#,
        )
        .await
        .unwrap();

    assert_eq!(response.response(), ProviderKind::Gemini.fallback_text());
    assert_eq!(response.source(), "google_gemini");
}
