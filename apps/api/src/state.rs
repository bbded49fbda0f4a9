use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable incident-catalog snapshot, loaded once at startup.
    /// Handlers only ever read it; there is no reload path.
    pub catalog: Arc<Catalog>,
    /// Completion backend behind a trait object so tests can script replies.
    pub llm: Arc<dyn CompletionBackend>,
    pub config: Config,
}
