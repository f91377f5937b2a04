//! Chat service: validation, provider call and response normalization
//!
//! The service is built once at startup and shared read-only across
//! requests. When the provider cannot be built (usually a missing API key)
//! the service is *degraded* for the lifetime of the process: every chat
//! request is rejected while the health endpoint keeps answering.

use crate::config::{FailurePolicy, ProviderConfig, ProviderKind};
use crate::error::{AppError, AppResult, ProviderError};
use crate::middleware::RequestId;
use crate::providers::{self, LlmProvider};
use crate::types::{ApiKeyStatus, ChatRequest, ChatResponse, HealthStatus};
use std::sync::Arc;
use std::time::Duration;

/// Chat service parameterized by a single LLM provider
pub struct ChatService {
    provider: Option<Arc<dyn LlmProvider>>,
    kind: ProviderKind,
    model: String,
    timeout: Duration,
    policy: FailurePolicy,
}

impl ChatService {
    /// Create a ready-to-serve service around an initialized provider
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let kind = provider.kind();
        let model = provider.model().to_string();
        Self {
            provider: Some(provider),
            kind,
            model,
            timeout: Duration::from_secs(30),
            policy: FailurePolicy::default(),
        }
    }

    /// Create a degraded service with no provider
    pub fn uninitialized(kind: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider: None,
            kind,
            model: model.into(),
            timeout: Duration::from_secs(30),
            policy: FailurePolicy::default(),
        }
    }

    /// Build the service from configuration and an optional API key
    ///
    /// Provider construction failures are logged and produce a degraded
    /// service; they never abort startup.
    pub fn from_config(config: &ProviderConfig, api_key: Option<String>) -> Self {
        let service = match providers::build_provider(config, api_key) {
            Ok(provider) => Self::new(provider),
            Err(e) => {
                tracing::error!(
                    provider = %config.kind,
                    error = %e,
                    "Failed to initialize chatbot; chat requests will be rejected until restart"
                );
                Self::uninitialized(config.kind, config.model())
            }
        };

        service
            .with_timeout(Duration::from_secs(config.timeout_seconds))
            .with_failure_policy(config.on_failure)
    }

    /// Bound each provider call by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a provider was successfully built at startup
    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Handle a raw `/api/chat` request body
    ///
    /// Order of checks: initialization, JSON parsing, message validation.
    /// Provider failures are resolved by [`apply_failure_policy`].
    pub async fn handle_chat(&self, request_id: RequestId, body: &[u8]) -> AppResult<ChatResponse> {
        let provider = self.provider.as_ref().ok_or(AppError::NotInitialized)?;

        let request = ChatRequest::from_slice(body)?;
        let message = request.validated_message()?;

        tracing::info!(
            request_id = %request_id,
            user_message = %message,
            "Incoming message"
        );

        let result = self.generate(&**provider, message).await;
        let text = apply_failure_policy(self.kind, self.policy, result)?;

        tracing::info!(
            request_id = %request_id,
            provider = %self.kind,
            response = %text,
            "Provider response"
        );

        Ok(ChatResponse::success(text, self.kind))
    }

    /// Current health snapshot; always "healthy", degraded or not
    pub fn health(&self) -> HealthStatus {
        let api_key_status = match &self.provider {
            Some(provider) if provider.has_credential() => ApiKeyStatus::Configured,
            _ => ApiKeyStatus::NotConfigured,
        };
        HealthStatus::healthy(self.kind, &self.model, api_key_status)
    }

    async fn generate(
        &self,
        provider: &dyn LlmProvider,
        message: &str,
    ) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, provider.generate(message)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: self.kind.as_str(),
                timeout_seconds: self.timeout.as_secs(),
            }),
        }
    }
}

/// Resolve a provider result into the answer text
///
/// With [`FailurePolicy::Fallback`] a failed call is logged and replaced by
/// the provider kind's fallback text, so the caller still sees a success.
/// With [`FailurePolicy::Error`] the failure is returned as-is.
pub fn apply_failure_policy(
    kind: ProviderKind,
    policy: FailurePolicy,
    result: Result<String, ProviderError>,
) -> AppResult<String> {
    match result {
        Ok(text) => Ok(text),
        Err(e) => match policy {
            FailurePolicy::Fallback => {
                tracing::error!(
                    provider = %kind,
                    error = %e,
                    "Error calling provider API; answering with fallback text"
                );
                Ok(kind.fallback_text().to_string())
            }
            FailurePolicy::Error => {
                tracing::error!(provider = %kind, error = %e, "Error calling provider API");
                Err(AppError::Provider(e))
            }
        },
    }
}
