use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::events::{DomainEvent, EventBus};

use crate::models::{DoctorError, DoctorRecord, TimeSlot};

/// Per-doctor recurring weekly windows. The window set is replaced wholesale:
/// a caller adding one slot must resend the entire set it last observed, and
/// the last write wins if two updates race.
pub struct AvailabilityService {
    store: StoreClient,
    bus: Arc<dyn EventBus>,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig, bus: Arc<dyn EventBus>) -> Self {
        Self {
            store: StoreClient::new(config),
            bus,
        }
    }

    /// Full overwrite of the doctor's window set. The windows themselves are
    /// not validated: end-before-start or duplicate day/time pairs are
    /// persisted as-is.
    pub async fn replace_windows(
        &self,
        doctor_id: &str,
        windows: Vec<TimeSlot>,
    ) -> Result<Vec<TimeSlot>, DoctorError> {
        debug!("Replacing availability for doctor {}", doctor_id);

        let updated: Vec<DoctorRecord> = self
            .store
            .update(
                "doctors",
                &format!("id=eq.{}", urlencoding::encode(doctor_id)),
                json!({ "available_slots": windows }),
            )
            .await?;

        let doctor = updated.into_iter().next().ok_or(DoctorError::NotFound)?;

        info!(
            "Availability replaced for doctor {} ({} windows)",
            doctor.id,
            doctor.available_slots.len()
        );

        // The event carries no slot data; interested clients re-fetch.
        self.bus.publish(DomainEvent::ScheduleUpdated {
            doctor_id: doctor.id,
            doctor_name: doctor.name,
        });

        Ok(doctor.available_slots)
    }
}
