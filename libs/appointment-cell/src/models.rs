use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::appointment::{AppointmentDetails, AppointmentStatus};
use shared_models::error::AppError;

/// Stored appointment row. The time slot is a free-text label copied verbatim
/// from the booking request; it is not re-validated against the doctor's live
/// availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub purpose: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl AppointmentRecord {
    /// Join the counterpart display fields onto the row. Reads always join;
    /// nothing is denormalized at write time.
    pub fn enrich(
        self,
        doctor_name: String,
        doctor_specialization: String,
        patient_name: String,
    ) -> AppointmentDetails {
        AppointmentDetails {
            id: self.id,
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            date: self.date,
            time_slot: self.time_slot,
            purpose: self.purpose,
            status: self.status,
            created_at: self.created_at,
            doctor_name,
            doctor_specialization,
            patient_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    /// Preferred doctor reference.
    pub doctor_id: Option<String>,
    /// Convenience fallback; exact case-sensitive match, rejected when the
    /// name is ambiguous.
    pub doctor_name: Option<String>,
    /// Accepted as a string and parsed in the service, so a malformed date is
    /// a 400 like every other invalid field.
    pub date: Option<String>,
    pub time_slot: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub message: String,
    pub appointment: AppointmentDetails,
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor name '{0}' is ambiguous")]
    AmbiguousDoctor(String),

    #[error("Patient not found")]
    PatientNotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::MissingFields
            | AppointmentError::InvalidDate(_)
            | AppointmentError::AmbiguousDoctor(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::DoctorNotFound | AppointmentError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
