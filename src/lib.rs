//! Weather Chat - a weather assistant chat gateway
//!
//! Exposes a single chat endpoint that forwards user text to one hosted LLM
//! provider (OpenAI, Google Gemini or Hugging Face) and returns the generated
//! answer in a normalized envelope, plus a health endpoint.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod providers;
pub mod service;
pub mod telemetry;
pub mod types;
