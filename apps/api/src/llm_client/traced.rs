//! Per-call tracing for completion providers, switched on by `LLM_TRACING_ENABLED`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{Completion, CompletionProvider, LlmError};

/// Decorates any provider with latency, size and token-usage logging.
/// Events nest under the caller's stage span.
pub struct TracedProvider {
    inner: Arc<dyn CompletionProvider>,
}

impl TracedProvider {
    pub fn new(inner: Arc<dyn CompletionProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CompletionProvider for TracedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<Completion, LlmError> {
        let started = Instant::now();
        let result = self.inner.complete(system, prompt).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(completion) => {
                let usage = completion.usage.unwrap_or_default();
                info!(
                    provider = self.inner.name(),
                    model = self.inner.model(),
                    elapsed_ms,
                    prompt_chars = system.len() + prompt.len(),
                    reply_chars = completion.text.len(),
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "completion finished"
                );
            }
            Err(e) => {
                warn!(
                    provider = self.inner.name(),
                    model = self.inner.model(),
                    elapsed_ms,
                    error = %e,
                    "completion failed"
                );
            }
        }

        result
    }
}
