use std::sync::Arc;

use crate::config::AppConfig;
use crate::state::store::SharedStore;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
