//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use minijinja::Environment;

use crate::config::Config;
use crate::entities::UpdateStore;
use crate::peer::PeerNotifier;
use crate::routes::board;

/// State shared across all HTTP handlers.
///
/// Holds no cached board data: every request reloads the document through
/// `store`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Whole-document update store.
    pub store: Arc<dyn UpdateStore>,
    /// Receives every newly created single update after it is saved.
    pub notifier: Arc<dyn PeerNotifier>,
    /// Compiled page templates.
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn UpdateStore>,
        notifier: Arc<dyn PeerNotifier>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            config: Arc::new(config),
            store,
            notifier,
            templates: Arc::new(board::templates()?),
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
