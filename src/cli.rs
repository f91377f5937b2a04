//! Command-line interface for the weather chat gateway
//!
//! Provides argument parsing and subcommand handling for the binary.

use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult};
use crate::providers::{self, ApiKey};
use clap::{Parser, Subcommand};
use std::io::Write;

/// Weather assistant chat gateway
#[derive(Parser)]
#[command(name = "weather-chat")]
#[command(version)]
#[command(about = "Weather assistant chat gateway backed by a hosted LLM")]
#[command(
    long_about = "Serves POST /api/chat and GET /api/health, forwarding chat messages \
    to the configured OpenAI, Gemini or Hugging Face model."
)]
pub struct Cli {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to a .env file holding provider API keys
    #[arg(long, default_value = ".env", global = true)]
    pub env_file: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Send one message to the configured provider and print the answer
    Probe {
        /// Message to send
        #[arg(default_value = "What is the weather like today?")]
        message: String,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Weather Chat Configuration
# ==========================
#
# API keys are NOT stored here. Put them in the environment or in a .env
# file next to the binary:
#
#   OPENAI_API_KEY=...   (provider.kind = "openai")
#   GEMINI_API_KEY=...   (provider.kind = "gemini")
#   HF_TOKEN=...         (provider.kind = "huggingface")

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
# Hostnames such as "localhost" are rejected; use an IP address.
host = "0.0.0.0"

# Port to listen on
port = 5000

# Upper bound for a whole HTTP request, in seconds (1-300). Must be larger
# than provider.timeout_seconds; requests running longer get a 408.
request_timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# PROVIDER
# ─────────────────────────────────────────────────────────────────────────────

[provider]
# Which hosted model answers chat requests: "openai", "gemini" or "huggingface"
kind = "openai"

# Model identifier (defaults: gpt-4o-mini, gemini-1.5-flash, gpt2)
model = "gpt-4o-mini"

# Override the upstream API base URL (useful for proxies and compatible servers)
# base_url = "https://api.openai.com/v1"

# Sampling temperature (0.0-2.0)
temperature = 0.7

# Upper bound for a single provider call, in seconds (1-300)
timeout_seconds = 30

# What to do when the provider call fails:
#   - "fallback": answer 200 with a canned apology (default)
#   - "error": answer 502 with the provider error
on_failure = "fallback"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG takes precedence)
log_level = "info"
"#
}

/// Send one message straight to the configured provider and report to `out`
///
/// Prints whether a credential was found, a redacted preview of it, the
/// provider and model under test, then the answer. A missing credential or a
/// failed call is returned as an error after the diagnostic lines are written.
pub async fn check_provider<W: Write>(
    config: &ProviderConfig,
    api_key: Option<String>,
    message: &str,
    out: &mut W,
) -> AppResult<()> {
    let kind = config.kind;

    writeln!(out, "Token loaded: {}", api_key.is_some()).map_err(write_failed)?;
    let preview = match &api_key {
        Some(key) => ApiKey::new(key.as_str()).preview(),
        None => format!("Not found ({} is not set)", kind.env_var()),
    };
    writeln!(out, "Token preview: {}", preview).map_err(write_failed)?;

    let provider = providers::build_provider(config, api_key)?;

    writeln!(
        out,
        "Testing {} with model {}...",
        kind.integration_name(),
        provider.model()
    )
    .map_err(write_failed)?;

    let answer = provider.generate(message).await?;
    writeln!(out, "Response: {}", answer).map_err(write_failed)?;

    Ok(())
}

fn write_failed(e: std::io::Error) -> AppError {
    AppError::Internal(format!("failed to write output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_arguments() {
        let cli = Cli::parse_from(["weather-chat"]);
        assert!(cli.config.is_none());
        assert_eq!(cli.env_file, ".env");
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["weather-chat", "--config", "custom.toml"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["weather-chat", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn provider_check_subcommand_has_default_message() {
        let cli = Cli::parse_from(["weather-chat", "probe"]);
        assert!(matches!(
            cli.command,
            Some(Command::Probe { ref message }) if message == "What is the weather like today?"
        ));
    }

    #[test]
    fn template_is_valid_toml() {
        let template = generate_config_template();
        let result: Result<toml::Value, _> = toml::from_str(template);
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }
}
