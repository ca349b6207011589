//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The whole HTTP surface is the tiny JSON API the pollers consume, plus a
//! health probe. CORS stays wide open so browser variants of the client can
//! poll from any origin.

pub mod game;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// API routes used by polling clients.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/gamestate", get(game::get_gamestate))
        .route("/api/setmode", post(game::set_mode))
        .route("/api/start", post(game::start))
        .route("/api/restart", post(game::restart))
        .route("/api/penalty", post(game::penalty))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
