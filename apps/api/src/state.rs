use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend selected at startup. Wrapped in `TracedProvider` when tracing is on.
    pub llm: Arc<dyn CompletionProvider>,
    pub config: Config,
}
