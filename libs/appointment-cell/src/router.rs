use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_models::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    // All appointment operations require authentication.
    let protected_routes = Router::new()
        .route(
            "/",
            post(handlers::book_appointment).get(handlers::list_appointments),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
