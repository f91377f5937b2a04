//! Hugging Face Inference API provider
//!
//! Text-generation models on the hosted inference API take a raw prompt, so
//! the message is framed as a "Weather Assistant" transcript and only the
//! continuation is requested back.

use super::{ApiKey, LlmProvider, http_client, send_json};
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "huggingface";

/// Tokens generated per answer
const MAX_NEW_TOKENS: u32 = 50;

/// End-of-text token id for GPT-2 family models
const PAD_TOKEN_ID: u32 = 50256;

pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f64,
    do_sample: bool,
    return_full_text: bool,
    pad_token_id: u32,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// Frame a user message as a text-generation prompt
pub fn build_prompt(message: &str) -> String {
    format!("Weather Assistant: {}\nResponse:", message)
}

impl HuggingFaceProvider {
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
impl LlmProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, message: &str) -> Result<String, ProviderError> {
        let body = InferenceRequest {
            inputs: build_prompt(message),
            parameters: InferenceParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: self.temperature,
                do_sample: true,
                return_full_text: false,
                pad_token_id: PAD_TOKEN_ID,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let request = self
            .client
            .post(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(self.api_key.expose())
            .json(&body);

        let generations: Vec<GeneratedText> = send_json(PROVIDER, request).await?;

        generations
            .into_iter()
            .next()
            .map(|generation| generation.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}
