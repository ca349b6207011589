//! Game state routes.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use protocol::{GameState, SetModeBody};

use crate::services::round;
use crate::state::AppState;

/// `GET /api/gamestate` — snapshot the current game state.
pub async fn get_gamestate(State(state): State<AppState>) -> Json<GameState> {
    let session = state.game.read().await;
    Json(session.snapshot_at(Instant::now()))
}

/// `POST /api/setmode` — client-driven mode write (GREEN, RED, or IDLE).
pub async fn set_mode(
    State(state): State<AppState>,
    Json(body): Json<SetModeBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut session = state.game.write().await;
    round::set_mode_at(&mut session, &state.config, body.mode, Instant::now())
        .map_err(round_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/start` — begin a round if none is running.
pub async fn start(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut session = state.game.write().await;
    let started = round::start_if_stopped_at(&mut session, &state.config, Instant::now());
    if !started {
        tracing::debug!(mode = %session.mode, "start requested while running; ignored");
    }
    Json(serde_json::json!({ "ok": true }))
}

/// `POST /api/restart` — unconditional reset to a fresh GREEN round.
pub async fn restart(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut session = state.game.write().await;
    round::start_round_at(&mut session, &state.config, Instant::now());
    Json(serde_json::json!({ "ok": true }))
}

/// `POST /api/penalty` — report a penalty; during RED this ends the game.
pub async fn penalty(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut session = state.game.write().await;
    round::report_penalty_at(&mut session, &state.config, Instant::now());
    Json(serde_json::json!({ "ok": true }))
}

fn round_error_to_status(err: round::RoundError) -> StatusCode {
    match err {
        round::RoundError::ModeNotSettable => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
#[path = "game_test.rs"]
mod tests;
