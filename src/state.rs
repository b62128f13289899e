use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::dispatch::EventRouter;

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub router: Arc<EventRouter>,
}

impl AppState {
    pub fn new(config: AppConfig, router: EventRouter) -> Self {
        Self {
            config: Arc::new(config),
            router: Arc::new(router),
        }
    }
}
