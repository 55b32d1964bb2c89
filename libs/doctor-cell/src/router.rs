use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_models::state::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: AppState) -> Router {
    // Directory reads are public.
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor));

    let protected_routes = Router::new()
        .route("/{doctor_id}/slots", put(handlers::update_slots))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
