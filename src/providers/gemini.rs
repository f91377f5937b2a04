//! Google Gemini provider
//!
//! Gemini receives a single prompt: the weather-assistant instruction, a
//! request for a concise answer, then the user's message.

use super::{ApiKey, LlmProvider, WEATHER_ASSISTANT_INSTRUCTION, http_client, send_json};
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "gemini";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
    temperature: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Build the single-shot prompt sent to Gemini
pub fn build_prompt(message: &str) -> String {
    format!(
        "{} Answer this question concisely: {}",
        WEATHER_ASSISTANT_INSTRUCTION, message
    )
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, api_key: ApiKey) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(PROVIDER, config.timeout_seconds)?,
            api_key,
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, message: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(message),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        tracing::debug!(
            model = %self.model,
            message_length = message.len(),
            "Sending generateContent request"
        );

        let request = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.expose())])
            .json(&body);

        let response: GenerateContentResponse = send_json(PROVIDER, request).await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse { provider: PROVIDER });
        }

        Ok(text.trim().to_string())
    }
}
