use std::sync::Arc;

use shared_config::AppConfig;

use crate::events::EventBus;

/// Router state for the cells that both read configuration and publish
/// domain events.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub bus: Arc<dyn EventBus>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, bus: Arc<dyn EventBus>) -> Self {
        Self { config, bus }
    }
}
