//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the typed config, the document store, and the optional LLM client.
//! Everything is built once in `main` and shared behind `Arc`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmChat;
use crate::services::store::DocumentStore;

/// Clone is required by Axum; every field is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    /// `None` when no server-side key is configured. Generation then needs a
    /// per-request key.
    pub llm: Option<Arc<dyn LlmChat>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>, llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { config: Arc::new(config), store, llm }
    }
}
