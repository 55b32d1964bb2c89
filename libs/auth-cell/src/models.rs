use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::models::TimeSlot;
use shared_models::auth::UserType;
use shared_models::error::AppError;

/// Stored patient row. Doctors live in their own collection, see
/// `doctor_cell::models::DoctorRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub user_type: Option<UserType>,
    pub specialization: Option<String>,
    #[serde(default)]
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Specialization required for doctors")]
    SpecializationRequired,

    #[error("User already exists with this email")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingFields | AuthError::SpecializationRequired | AuthError::EmailTaken => {
                AppError::BadRequest(err.to_string())
            }
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Hashing(msg) | AuthError::Signing(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
