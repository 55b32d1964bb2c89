use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use shared_models::appointment::AppointmentDetails;
use shared_models::auth::{AuthUser, UserType};
use shared_models::error::AppError;
use shared_models::state::AppState;

use crate::models::{BookAppointmentRequest, BookingResponse};
use crate::services::booking::BookingService;
use crate::services::ledger::LedgerService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    debug!("Booking request from user {}", user.id);

    if user.user_type != UserType::Patient {
        return Err(AppError::Forbidden(
            "Only patients can book appointments".to_string(),
        ));
    }

    let service = BookingService::new(&state.config, state.bus.clone());
    let appointment = service.create_booking(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Appointment created successfully".to_string(),
            appointment,
        }),
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AppointmentDetails>>, AppError> {
    let service = LedgerService::new(&state.config);

    let appointments = service.list_for_user(&user).await?;

    Ok(Json(appointments))
}
