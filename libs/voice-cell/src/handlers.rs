use std::sync::Arc;

use axum::{
    extract::{Json, State},
};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ExtractRequest, ExtractedAppointment};
use crate::services::extraction::ExtractionService;

#[axum::debug_handler]
pub async fn extract_fields(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractedAppointment>, AppError> {
    let transcript = match request.transcript {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AppError::BadRequest("Missing transcript".to_string())),
    };

    debug!("Voice extraction request ({} chars)", transcript.len());

    let service = ExtractionService::new(&config);
    let fields = service.extract(&transcript).await?;

    Ok(Json(fields))
}
