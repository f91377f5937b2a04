//! Request and response envelopes for the chat API

use crate::config::{ProviderKind, SERVICE_NAME};
use crate::error::{AppError, AppResult, MESSAGE_REQUIRED};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current wall-clock time as an RFC 3339 / ISO-8601 string
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Chat request from client
///
/// Built only through [`ChatRequest::from_slice`]. A missing `message` reads
/// as empty and is rejected by [`ChatRequest::validated_message`]. A
/// `message` of the wrong JSON type is a malformed body.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Parse a raw request body
    ///
    /// Any JSON error is an unexpected server-side failure, not a validation
    /// failure: it maps to `AppError::ServerError`.
    pub fn from_slice(body: &[u8]) -> AppResult<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| AppError::ServerError(e.to_string()))?;

        // Derived struct deserialization would also accept `["text"]`
        let object = value.as_object().ok_or_else(|| {
            AppError::ServerError(format!("expected a JSON object, got {}", json_type(&value)))
        })?;

        match object.get("message") {
            None => Ok(Self::default()),
            Some(serde_json::Value::String(message)) => Ok(Self::new(message.as_str())),
            Some(other) => Err(AppError::ServerError(format!(
                "'message' must be a string, got {}",
                json_type(other)
            ))),
        }
    }

    /// Get the message as sent
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the trimmed message, rejecting blank input
    pub fn validated_message(&self) -> AppResult<&str> {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(MESSAGE_REQUIRED.to_string()));
        }
        Ok(trimmed)
    }
}

/// Successful chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    response: String,
    timestamp: String,
    status: String,
    source: String,
}

impl ChatResponse {
    /// Build a success envelope stamped with the current time
    pub fn success(response: String, provider: ProviderKind) -> Self {
        Self {
            response,
            timestamp: now_iso8601(),
            status: "success".to_string(),
            source: provider.source_id().to_string(),
        }
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Whether the provider credential was available at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiKeyStatus {
    #[serde(rename = "configured")]
    Configured,
    #[serde(rename = "not configured")]
    NotConfigured,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub llm_integration: String,
    pub api_key_status: ApiKeyStatus,
    pub model: String,
}

impl HealthStatus {
    pub fn healthy(provider: ProviderKind, model: &str, api_key_status: ApiKeyStatus) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: now_iso8601(),
            service: SERVICE_NAME.to_string(),
            llm_integration: provider.integration_name().to_string(),
            api_key_status,
            model: model.to_string(),
        }
    }
}
