use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub transcript: Option<String>,
}

/// Best-effort parse of the model's output. Every field is optional: the
/// model is never trusted to include any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAppointment {
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Language model request failed: {0}")]
    Upstream(String),

    /// The model replied, but no parseable JSON object was found in its
    /// output.
    #[error("Invalid JSON output from language model")]
    InvalidOutput,
}

impl From<VoiceError> for AppError {
    fn from(err: VoiceError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
