use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::AuthResponse;
use shared_models::error::AppError;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::account::AccountService;

#[axum::debug_handler]
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    debug!("Registration request for {:?}", request.email);

    let service = AccountService::new(&config);
    let response = service.register(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    debug!("Login request for {:?}", request.email);

    let service = AccountService::new(&config);
    let response = service.login(request).await?;

    Ok(Json(response))
}
