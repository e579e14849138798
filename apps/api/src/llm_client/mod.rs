//! LLM client: the single point of entry for every chat-completion call.
//!
//! ARCHITECTURAL RULE: no other module talks to a model endpoint directly.
//! Stages depend on the `CompletionProvider` trait; the concrete backend
//! (OpenAI-compatible or Anthropic) is picked from `LlmConfig` at startup.
//!
//! No retry loop: a failed call is reported to the
//! caller as-is. Every call is bounded by the client timeout from config.
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{LlmConfig, ProviderKind};

pub mod anthropic;
pub mod openai;
pub mod prompts;
pub mod traced;

#[cfg(test)]
pub mod testing;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiCompatibleProvider;
pub use traced::TracedProvider;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Token accounting reported by the backend, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The text of a single completion plus whatever usage the backend returned.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

/// A chat-completion capability: one system instruction, one user message,
/// one text reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Backend label for logs ("openai", "anthropic", ...).
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion, LlmError>;
}

/// Builds the configured provider, wrapped in `TracedProvider` when tracing is on.
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn CompletionProvider>> {
    let http = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiCompatibleProvider::new(http, config)),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(http, config)?),
    };

    info!(
        "LLM provider initialized (backend: {}, model: {}, tracing: {})",
        provider.name(),
        provider.model(),
        config.tracing_enabled
    );

    if config.tracing_enabled {
        Ok(Arc::new(TracedProvider::new(provider)))
    } else {
        Ok(provider)
    }
}

/// Maps a transport failure, distinguishing client-side timeouts.
pub(crate) fn classify_http_error(err: reqwest::Error, timeout_secs: u64) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout(timeout_secs)
    } else {
        LlmError::Http(err)
    }
}
