use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Appointment enriched with the counterpart display fields. This is the shape
/// returned by the API and carried by the `appointmentBooked` event; the join
/// happens at read time, nothing is denormalized at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub purpose: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub doctor_name: String,
    pub doctor_specialization: String,
    pub patient_name: String,
}
