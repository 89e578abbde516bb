use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::storage::JsonStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    /// Pluggable text generator. Production: the Anthropic client.
    pub llm: Arc<dyn TextGenerator>,
}
