//! Upstream LLM providers
//!
//! Every hosted model is reached through the [`LlmProvider`] capability: a
//! single `generate` call taking the user's message and returning the answer
//! text. Exactly one provider is built per process, chosen by
//! `provider.kind` in the configuration.

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod gemini;
pub mod huggingface;
pub mod openai;

pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;

/// Instruction given to every provider ahead of the user's message
pub const WEATHER_ASSISTANT_INSTRUCTION: &str = "You are a helpful weather assistant.";

/// Upstream error bodies longer than this are cut before logging
const MAX_ERROR_BODY_CHARS: usize = 1_000;

/// Text generation capability backed by a hosted LLM
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Which integration this provider implements
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent upstream
    fn model(&self) -> &str;

    /// Whether a non-empty credential is held
    fn has_credential(&self) -> bool {
        true
    }

    /// Generate an answer for a single user message
    async fn generate(&self, message: &str) -> Result<String, ProviderError>;
}

/// Secret API key
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First few characters followed by an ellipsis, for diagnostics
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(6).collect();
        format!("{}…", head)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Build the provider selected by `config.kind`
///
/// Fails with [`ProviderError::MissingCredential`] when no key is given.
pub fn build_provider(
    config: &ProviderConfig,
    api_key: Option<String>,
) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    let api_key = api_key
        .map(ApiKey::new)
        .filter(|key| !key.is_empty())
        .ok_or(ProviderError::MissingCredential {
            env_var: config.kind.env_var(),
        })?;

    let provider: Arc<dyn LlmProvider> = match config.kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config, api_key)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config, api_key)?),
        ProviderKind::HuggingFace => Arc::new(HuggingFaceProvider::new(config, api_key)?),
    };

    tracing::info!(
        provider = %provider.kind(),
        model = %provider.model(),
        base_url = %config.base_url(),
        "LLM provider initialized"
    );

    Ok(provider)
}

/// Build the shared HTTP client for a provider
pub(crate) fn http_client(
    provider: &'static str,
    timeout_seconds: u64,
) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|source| ProviderError::ClientBuild { provider, source })
}

/// Send a prepared request and decode a JSON success body
///
/// Non-2xx statuses become [`ProviderError::Status`] carrying the (truncated)
/// upstream body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Http { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ProviderError::Http { provider, source })?;

    serde_json::from_slice(&bytes).map_err(|e| ProviderError::MalformedResponse {
        provider,
        reason: e.to_string(),
    })
}

/// Cut `text` to at most `max_chars` characters without splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
