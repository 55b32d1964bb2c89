use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

/// A doctor-declared recurring weekly window. Times are wall-clock strings
/// with no timezone modeling. Nothing rejects a window whose end precedes its
/// start, or two windows that overlap on the same day; whatever the doctor
/// submits is stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start_time: String,
    pub end_time: String,
    /// 0 (Sunday) through 6 (Saturday).
    pub day_of_week: i32,
}

/// Stored doctor row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub specialization: String,
    #[serde(default)]
    pub available_slots: Vec<TimeSlot>,
}

/// Public directory entry: credentials and contact details stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub available_slots: Vec<TimeSlot>,
}

impl From<DoctorRecord> for DoctorProfile {
    fn from(record: DoctorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            specialization: record.specialization,
            available_slots: record.available_slots,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSlotsRequest {
    pub available_slots: Option<Vec<TimeSlot>>,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
