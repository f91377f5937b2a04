//! Configuration management for the weather chat gateway
//!
//! Parses TOML configuration files, applies environment overrides and
//! provides typed access to settings. Provider credentials never live in the
//! TOML file; they are read from the environment variable owned by the
//! configured provider kind.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

/// Config file looked up when no `--config` path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "Weather Chatbot API";

/// Upper bound for provider and request timeouts, in seconds
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole HTTP request, in seconds
    ///
    /// Must exceed `provider.timeout_seconds` so a slow provider still gets
    /// the fallback answer instead of a bare 408.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to
    ///
    /// Hostnames are rejected rather than resolved; `host` must be an IP literal.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "server.host must be an IP address such as 127.0.0.1 or 0.0.0.0, got '{}'",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_seconds() -> u64 {
    60
}

/// Which hosted LLM backs the chat endpoint
///
/// Exactly one kind is active per process. Each kind fixes the environment
/// variable holding its credential, its default model, the identifiers
/// reported to clients and the fallback text used when a call fails.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
    HuggingFace,
}

impl ProviderKind {
    /// Lowercase identifier as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Environment variable holding the API key for this provider
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::HuggingFace => "HF_TOKEN",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
            Self::HuggingFace => "gpt2",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::HuggingFace => "https://api-inference.huggingface.co",
        }
    }

    /// Value of the `source` field in chat responses
    pub fn source_id(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai_gpt",
            Self::Gemini => "google_gemini",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Value of the `llm_integration` field in health responses
    pub fn integration_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI GPT",
            Self::Gemini => "Google Gemini",
            Self::HuggingFace => "Hugging Face Inference",
        }
    }

    /// Canned answer substituted when the provider call fails
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::OpenAi => {
                "I'm sorry, I couldn't fetch the response right now. Please try again."
            }
            Self::Gemini => {
                "I'm sorry, I couldn't reach my weather knowledge base right now. Please try again."
            }
            Self::HuggingFace => {
                "I'm sorry, the weather model is unavailable right now. Please try again."
            }
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            other => Err(AppError::Config(format!(
                "unknown provider '{}' (expected openai, gemini or huggingface)",
                other
            ))),
        }
    }
}

/// What the chat endpoint does when the provider call fails
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Answer 200 with the provider's fallback text
    #[default]
    Fallback,
    /// Answer 502 with the provider error
    Error,
}

/// Provider configuration
///
/// `model` and `base_url` are optional in the file; the provider kind
/// supplies defaults. Use the accessors rather than the raw fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            base_url: None,
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            on_failure: FailurePolicy::default(),
        }
    }
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_seconds() -> u64 {
    30
}

impl ProviderConfig {
    /// Create a provider config with defaults for the given kind
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Override the upstream base URL (used to point at mock servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Configured model, or the provider kind's default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }

    /// Configured base URL without trailing slash, or the provider kind's default
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
            .trim_end_matches('/')
    }

    /// Read this provider's API key from the process environment
    ///
    /// Blank values count as missing.
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(self.kind.env_var())
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Resolve configuration for process startup
    ///
    /// An explicitly requested file must exist. Without one, `config.toml` is
    /// used if present and built-in defaults otherwise. Environment overrides
    /// are applied last and the result is validated again.
    pub fn load(explicit_path: Option<&str>) -> AppResult<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => {
                tracing::debug!("No config file found, using built-in defaults");
                Self::default()
            }
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `WEATHER_CHAT_*` overrides using the given variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("WEATHER_CHAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("WEATHER_CHAT_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!("WEATHER_CHAT_PORT is not a valid port: {}", port))
            })?;
        }
        if let Some(kind) = lookup("WEATHER_CHAT_PROVIDER") {
            self.provider.kind = kind.parse()?;
        }
        Ok(())
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()` and `load()`, but can also
    /// be called explicitly when constructing Config via other means.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        self.server.socket_addr()?;

        let request_timeout = self.server.request_timeout_seconds;
        if request_timeout == 0 || request_timeout > MAX_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "server.request_timeout_seconds must be in 1..={}, got {}",
                MAX_TIMEOUT_SECONDS, request_timeout
            )));
        }

        let temperature = self.provider.temperature;
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::Config(format!(
                "provider.temperature must be a finite number between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        let timeout = self.provider.timeout_seconds;
        if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "provider.timeout_seconds must be in 1..={}, got {}",
                MAX_TIMEOUT_SECONDS, timeout
            )));
        }

        if timeout >= request_timeout {
            return Err(AppError::Config(format!(
                "provider.timeout_seconds ({}) must be less than server.request_timeout_seconds ({})",
                timeout, request_timeout
            )));
        }

        let base_url = self.provider.base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "provider.base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        if self.provider.model().trim().is_empty() {
            return Err(AppError::Config(
                "provider.model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
