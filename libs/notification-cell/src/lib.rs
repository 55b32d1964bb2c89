use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::bus::BroadcastBus;

pub mod handlers;
pub mod router;
pub mod services;

/// State for the WebSocket endpoint: it needs the concrete bus to subscribe,
/// not just the publish capability.
#[derive(Clone)]
pub struct NotificationState {
    pub config: Arc<AppConfig>,
    pub bus: Arc<BroadcastBus>,
}
