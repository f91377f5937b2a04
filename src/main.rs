//! Weather Chat HTTP server
//!
//! Starts an Axum web server that forwards chat messages to the configured
//! LLM provider.

use clap::Parser;
use std::time::Duration;
use weather_chat::{
    cli::{Cli, Command, check_provider, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    service::ChatService,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = &cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(path, template)?;
                println!("Wrote template configuration to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Existing environment variables win over the .env file
    let env_file = dotenvy::from_path(&cli.env_file);

    let config = Config::load(cli.config.as_deref())?;
    telemetry::init(&config.observability.log_level);

    match env_file {
        Ok(()) => tracing::debug!(path = %cli.env_file, "Loaded environment file"),
        Err(e) if e.not_found() => {
            tracing::debug!(path = %cli.env_file, "No environment file found")
        }
        Err(e) => tracing::warn!(path = %cli.env_file, error = %e, "Failed to load environment file"),
    }

    match cli.command {
        Some(Command::Probe { message }) => {
            let api_key = config.provider.api_key_from_env();
            let mut stdout = std::io::stdout();
            check_provider(&config.provider, api_key, &message, &mut stdout).await?;
            Ok(())
        }
        _ => serve(config).await,
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        provider = %config.provider.kind,
        model = %config.provider.model(),
        "Starting Weather Chatbot API with {}",
        config.provider.kind.integration_name()
    );

    let api_key = config.provider.api_key_from_env();
    let service = ChatService::from_config(&config.provider, api_key);
    if !service.is_initialized() {
        tracing::error!(
            env_var = config.provider.kind.env_var(),
            "!!! CRITICAL ERROR: Chatbot failed to start. Check {} in the environment or .env file. !!!",
            config.provider.kind.env_var()
        );
    }

    let state = AppState::new(service).with_request_timeout(Duration::from_secs(
        config.server.request_timeout_seconds,
    ));
    let app = handlers::router(state);

    let addr = config.server.socket_addr()?;

    tracing::info!("API available at http://{}", addr);
    tracing::info!("Health check available at http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
