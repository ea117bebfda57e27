//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the websocket event channel and the school
//! administration API under a single Axum router. Page rendering belongs to
//! the clients; the server only speaks JSON.

pub mod schools;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/schools", get(schools::list_schools).post(schools::create_school))
        .route(
            "/api/schools/{name}",
            get(schools::get_school).delete(schools::delete_school),
        )
        .route("/api/schools/{name}/toggle", post(schools::toggle_school))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
