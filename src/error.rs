//! Error types for the weather chat gateway
//!
//! All errors implement `IntoResponse` for Axum handlers. Provider failures
//! have their own type because they are normally masked by the failure
//! policy rather than returned to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error body returned when the provider could not be initialized at startup
pub const NOT_INITIALIZED_MESSAGE: &str = "Chatbot is not initialized. Check your API key.";

/// Error body returned when a chat request carries no usable message
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    /// The provider credential was missing at startup; permanent for this process
    #[error("{}", NOT_INITIALIZED_MESSAGE)]
    NotInitialized,

    #[error("{0}")]
    Validation(String),

    /// Unexpected failure while handling a request (malformed body, etc.)
    #[error("{0}")]
    ServerError(String),

    /// Provider failure surfaced to the caller (only with `on_failure = "error"`)
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            Self::NotInitialized => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": NOT_INITIALIZED_MESSAGE }),
            ),
            Self::ServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": msg, "status": "server_error" }),
            ),
            Self::Provider(err) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": err.to_string(), "status": "provider_error" }),
            ),
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single upstream LLM provider call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No API key configured (expected environment variable {env_var})")]
    MissingCredential { env_var: &'static str },

    #[error("Failed to build HTTP client for {provider}: {source}")]
    ClientBuild {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned a malformed response: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} returned no generated text")]
    EmptyResponse { provider: &'static str },

    #[error("Request to {provider} timed out after {timeout_seconds} seconds")]
    Timeout {
        provider: &'static str,
        timeout_seconds: u64,
    },
}
