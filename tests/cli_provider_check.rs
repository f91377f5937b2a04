//! One-shot provider check printed by the CLI

use serde_json::json;
use weather_chat::{
    cli::check_provider,
    config::{ProviderConfig, ProviderKind},
    error::{AppError, ProviderError},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn output_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .expect("output should be UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_huggingface_check_prints_token_and_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gpt2"))
        .and(header("authorization", "Bearer hf_test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "generated_text": " Mild with scattered showers." }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::for_kind(ProviderKind::HuggingFace).with_base_url(server.uri());
    let mut out = Vec::new();

    check_provider(
        &config,
        Some("hf_test_token".to_string()),
        "What is the weather like today?",
        &mut out,
    )
    .await
    .expect("check should succeed");

    assert_eq!(
        output_lines(&out),
        vec![
            "Token loaded: true",
            "Token preview: hf_tes…",
            "Testing Hugging Face Inference with model gpt2...",
            "Response: Mild with scattered showers.",
        ]
    );
}

#[tokio::test]
async fn test_missing_key_reports_env_var_and_fails() {
    let config = ProviderConfig::for_kind(ProviderKind::HuggingFace);
    let mut out = Vec::new();

    let err = check_provider(&config, None, "hi", &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Provider(ProviderError::MissingCredential { env_var: "HF_TOKEN" })
    ));
    assert_eq!(
        output_lines(&out),
        vec![
            "Token loaded: false",
            "Token preview: Not found (HF_TOKEN is not set)",
        ]
    );
}

#[tokio::test]
async fn test_upstream_failure_is_returned_after_diagnostics() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gpt2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Model gpt2 is currently loading"))
        .mount(&server)
        .await;

    let config = ProviderConfig::for_kind(ProviderKind::HuggingFace).with_base_url(server.uri());
    let mut out = Vec::new();

    let err = check_provider(&config, Some("hf_test_token".to_string()), "hi", &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Provider(ProviderError::Status { status: 503, .. })
    ));
    let lines = output_lines(&out);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "Testing Hugging Face Inference with model gpt2...");
}
