use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use notification_cell::router::notification_routes;
use notification_cell::services::bus::BroadcastBus;
use notification_cell::NotificationState;
use shared_config::AppConfig;
use shared_models::state::AppState;
use voice_cell::router::voice_routes;

pub fn create_router(config: Arc<AppConfig>, bus: Arc<BroadcastBus>) -> Router {
    let state = AppState::new(config.clone(), bus.clone());
    let ws_state = NotificationState {
        config: config.clone(),
        bus,
    };

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes(config.clone()))
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state))
        .nest("/api/voice", voice_routes(config))
        .merge(notification_routes(ws_state))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Voice Appointment System API is running"
    }))
}
