//! Contains all the routes that this application can handle.

mod api;

use crate::AppState;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .nest("/api", api_routes(app_state))
}

/// API - Routes nested under "/api" path.
/// Only POST is registered for the waitlist; axum answers any other verb
/// with 405 before the handler runs.
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/waitlist", post(api::waitlist_join))
        .with_state(app_state)
}
