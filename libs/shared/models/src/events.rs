use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentDetails;

/// Domain events broadcast to connected clients. The wire tag matches the
/// event names clients subscribe to (`appointmentBooked`, `scheduleUpdated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum DomainEvent {
    #[serde(rename_all = "camelCase")]
    AppointmentBooked { appointment: AppointmentDetails },
    /// Carries no slot data; recipients must re-fetch the doctor's windows.
    #[serde(rename_all = "camelCase")]
    ScheduleUpdated {
        doctor_id: String,
        doctor_name: String,
    },
}

/// Publish-only capability handed to the booking and availability services.
/// Delivery is fire-and-forget, at-most-once, with no replay for late
/// subscribers.
pub trait EventBus: Send + Sync {
    fn publish(&self, event: DomainEvent);
}
