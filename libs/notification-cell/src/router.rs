use axum::{routing::get, Router};

use crate::{handlers, NotificationState};

pub fn notification_routes(state: NotificationState) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws_handler))
        .with_state(state)
}
