use tokio::sync::broadcast;
use tracing::debug;

use shared_models::events::{DomainEvent, EventBus};

/// Process-wide fan-out over a tokio broadcast channel. Fire-and-forget,
/// at-most-once: there is no acknowledgment, no replay, and a subscriber that
/// connects after an event was published never sees it.
pub struct BroadcastBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl EventBus for BroadcastBus {
    fn publish(&self, event: DomainEvent) {
        // Publishing with no connected clients is not an error.
        if let Err(e) = self.sender.send(event) {
            debug!("No subscribers for event: {}", e);
        }
    }
}
