use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::state::AppState;

use crate::models::{DoctorProfile, ReplaceSlotsRequest};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<DoctorProfile>>, AppError> {
    let service = DoctorService::new(&state.config);

    let doctors = service.list_doctors().await?;

    Ok(Json(doctors.into_iter().map(DoctorProfile::from).collect()))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorProfile>, AppError> {
    let service = DoctorService::new(&state.config);

    let doctor = service.get_doctor(&doctor_id).await?;

    Ok(Json(DoctorProfile::from(doctor)))
}

/// Wholesale replacement of the caller's availability windows. Only the
/// doctor identified by the path id may update their own slots.
#[axum::debug_handler]
pub async fn update_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ReplaceSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Slot update for doctor {} by user {}", doctor_id, user.id);

    if user.id != doctor_id {
        return Err(AppError::Forbidden(
            "Unauthorized to update this doctor's slots".to_string(),
        ));
    }

    let windows = request.available_slots.unwrap_or_default();

    let service = AvailabilityService::new(&state.config, state.bus.clone());
    let stored = service.replace_windows(&doctor_id, windows).await?;

    Ok(Json(json!({
        "message": "Available slots updated successfully",
        "availableSlots": stored
    })))
}
