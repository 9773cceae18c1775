use std::sync::Arc;

use crate::config::Config;
use crate::history::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable history backend. Default: FileHistoryStore. Swap via HISTORY_BACKEND env.
    pub history: Arc<dyn HistoryStore>,
}
