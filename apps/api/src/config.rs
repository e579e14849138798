use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

/// Most provider calls a single request can make.
const SEQUENTIAL_LLM_CALLS: u32 = 3;

/// Which chat-completion backend the pipeline talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Any OpenAI-compatible `/chat/completions` endpoint (OpenAI, Groq, Ollama).
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.groq.com/openai/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1/messages",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "llama3-8b-8192",
            ProviderKind::Anthropic => "claude-sonnet-4-5",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "groq" | "ollama" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(anyhow!("Unknown LLM_PROVIDER '{other}'")),
        }
    }
}

/// Everything a completion provider needs. Passed explicitly at construction;
/// nothing is read from process-wide state after startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub tracing_enabled: bool,
}

/// Parameters of the recursive character splitter applied to extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm: LlmConfig,
    pub chunking: ChunkingConfig,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("LLM_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>()?,
            None => ProviderKind::OpenAi,
        };

        let api_key = lookup("LLM_API_KEY").filter(|k| !k.trim().is_empty());
        if provider == ProviderKind::Anthropic && api_key.is_none() {
            bail!("Required environment variable 'LLM_API_KEY' is not set (LLM_PROVIDER=anthropic)");
        }

        let chunking = ChunkingConfig {
            chunk_size: parse_or(&lookup, "CHUNK_SIZE", 1000)?,
            chunk_overlap: parse_or(&lookup, "CHUNK_OVERLAP", 100)?,
        };
        if chunking.chunk_size == 0 || chunking.chunk_overlap >= chunking.chunk_size {
            bail!(
                "CHUNK_OVERLAP ({}) must be smaller than a non-zero CHUNK_SIZE ({})",
                chunking.chunk_overlap,
                chunking.chunk_size
            );
        }

        let llm_timeout = Duration::from_secs(parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?);
        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 420)?);
        // Keyword suggestion, synthesis and cover letter run back to back.
        if request_timeout <= llm_timeout * SEQUENTIAL_LLM_CALLS {
            bail!(
                "REQUEST_TIMEOUT_SECS ({}) must exceed {} x LLM_TIMEOUT_SECS ({})",
                request_timeout.as_secs(),
                SEQUENTIAL_LLM_CALLS,
                llm_timeout.as_secs()
            );
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm: LlmConfig {
                provider,
                endpoint: lookup("LLM_ENDPOINT")
                    .unwrap_or_else(|| provider.default_endpoint().to_string()),
                model: lookup("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
                api_key,
                max_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", 4096)?,
                timeout: llm_timeout,
                tracing_enabled: parse_or(&lookup, "LLM_TRACING_ENABLED", false)?,
            },
            chunking,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            request_timeout,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
