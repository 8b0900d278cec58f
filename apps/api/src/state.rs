use std::sync::Arc;

use crate::config::Config;
use crate::store::ResearchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Postgres in production, in-memory for tests and demos.
    pub store: Arc<dyn ResearchStore>,
    pub config: Config,
}

impl AppState {
    /// Identity used when a request does not carry one.
    pub fn default_user_id(&self) -> &str {
        &self.config.default_user_id
    }
}
