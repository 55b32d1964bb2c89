use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use auth_cell::models::PatientRecord;
use doctor_cell::models::{DoctorError, DoctorRecord};
use doctor_cell::services::doctor::DoctorService;
use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::appointment::{AppointmentDetails, AppointmentStatus};
use shared_models::auth::AuthUser;
use shared_models::events::{DomainEvent, EventBus};

use crate::models::{AppointmentError, AppointmentRecord, BookAppointmentRequest};

/// Validates and creates ledger entries. The supplied date, slot label and
/// purpose are persisted verbatim: the label is not checked against the
/// doctor's declared windows, the date's weekday is not checked against the
/// window's day, and no uniqueness holds over (doctor, date, slot) - two
/// concurrent bookings for the same tuple both succeed.
pub struct BookingService {
    store: StoreClient,
    doctors: DoctorService,
    bus: Arc<dyn EventBus>,
}

impl BookingService {
    pub fn new(config: &AppConfig, bus: Arc<dyn EventBus>) -> Self {
        Self {
            store: StoreClient::new(config),
            doctors: DoctorService::new(config),
            bus,
        }
    }

    pub async fn create_booking(
        &self,
        patient: &AuthUser,
        request: BookAppointmentRequest,
    ) -> Result<AppointmentDetails, AppointmentError> {
        let date_text = require_text(request.date)?;
        let date: NaiveDate = date_text
            .parse()
            .map_err(|_| AppointmentError::InvalidDate(date_text))?;
        let time_slot = require_text(request.time_slot)?;
        let purpose = require_text(request.purpose)?;

        let doctor = self
            .resolve_doctor(request.doctor_id, request.doctor_name)
            .await?;

        let mut patients: Vec<PatientRecord> = self
            .store
            .select(
                "patients",
                &format!("id=eq.{}", urlencoding::encode(&patient.id)),
            )
            .await?;

        if patients.is_empty() {
            return Err(AppointmentError::PatientNotFound);
        }
        let patient_record = patients.remove(0);

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "doctor_id": doctor.id,
            "patient_id": patient_record.id,
            "date": date,
            "time_slot": time_slot,
            "purpose": purpose,
            "status": AppointmentStatus::Pending,
            "created_at": Utc::now(),
        });

        let stored: AppointmentRecord = self.store.insert("appointments", row).await?;

        info!(
            "Appointment {} booked: patient {} with doctor {} on {}",
            stored.id, stored.patient_id, stored.doctor_id, stored.date
        );

        let details = stored.enrich(
            doctor.name,
            doctor.specialization,
            patient_record.name,
        );

        // Emitted after the write completes; delivery is fire-and-forget.
        self.bus.publish(DomainEvent::AppointmentBooked {
            appointment: details.clone(),
        });

        Ok(details)
    }

    /// Resolve the doctor reference: by id when given, otherwise by exact
    /// display-name match. A name matching more than one doctor is rejected
    /// rather than silently picking the first.
    async fn resolve_doctor(
        &self,
        doctor_id: Option<String>,
        doctor_name: Option<String>,
    ) -> Result<DoctorRecord, AppointmentError> {
        if let Some(id) = doctor_id.filter(|id| !id.is_empty()) {
            return self.doctors.get_doctor(&id).await.map_err(|e| match e {
                DoctorError::NotFound => AppointmentError::DoctorNotFound,
                DoctorError::Store(e) => AppointmentError::Store(e),
            });
        }

        let name = doctor_name
            .filter(|n| !n.is_empty())
            .ok_or(AppointmentError::MissingFields)?;

        debug!("Resolving doctor by name: {}", name);

        let mut matches = self.doctors.find_by_name(&name).await.map_err(|e| match e {
            DoctorError::NotFound => AppointmentError::DoctorNotFound,
            DoctorError::Store(e) => AppointmentError::Store(e),
        })?;

        match matches.len() {
            0 => Err(AppointmentError::DoctorNotFound),
            1 => Ok(matches.remove(0)),
            _ => Err(AppointmentError::AmbiguousDoctor(name)),
        }
    }
}

fn require_text(value: Option<String>) -> Result<String, AppointmentError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppointmentError::MissingFields),
    }
}
