use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::events::DomainEvent;
use shared_utils::jwt::validate_token;

use crate::NotificationState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Authenticated WebSocket endpoint. Browsers cannot set headers on a socket
/// upgrade, so the session token travels as a query parameter.
#[axum::debug_handler]
pub async fn ws_handler(
    State(state): State<NotificationState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let token = query
        .token
        .ok_or_else(|| AppError::Auth("Access token required".to_string()))?;

    let user = validate_token(&token, &state.config.jwt_secret)
        .map_err(|_| AppError::Forbidden("Invalid or expired token".to_string()))?;

    let events = state.bus.subscribe();

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, user, events)))
}

async fn handle_socket(
    mut socket: WebSocket,
    user: AuthUser,
    mut events: broadcast::Receiver<DomainEvent>,
) {
    info!("Client connected: {}", user.id);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if !is_interested(&user, &event) {
                        continue;
                    }

                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };

                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Slow consumer; dropped events are not replayed.
                    warn!("Client {} lagged, {} events dropped", user.id, skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = socket.recv() => match message {
                Some(Ok(_)) => {
                    debug!("Ignoring inbound message from {}", user.id);
                    continue;
                }
                _ => break,
            },
        }
    }

    info!("Client disconnected: {}", user.id);
}

/// Server-side scoping: booking events go only to the two participants.
/// Schedule updates carry no slot data and go to everyone, who must re-fetch.
pub fn is_interested(user: &AuthUser, event: &DomainEvent) -> bool {
    match event {
        DomainEvent::AppointmentBooked { appointment } => {
            appointment.doctor_id == user.id || appointment.patient_id == user.id
        }
        DomainEvent::ScheduleUpdated { .. } => true,
    }
}
