//! Round service — game rules and the autopilot driver.
//!
//! DESIGN
//! ======
//! The autopilot is a background task ticking once per second. While the mode
//! is GREEN or RED it counts the phase timer down and flips to the opposite
//! phase at zero (GREEN 5s, RED 4s by default). GAME_OVER and IDLE freeze the
//! driver: a finished game waits for an explicit restart rather than
//! auto-resuming.
//!
//! Mode authority is last-writer-wins: client setmode requests land between
//! ticks and simply re-arm the countdown for the requested phase.

use std::time::{Duration, Instant};

use protocol::Mode;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::state::{AppState, GameSession};

#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("GAME_OVER cannot be set directly; report a penalty instead")]
    ModeNotSettable,
}

/// Spawn the autopilot round driver. Returns a handle for shutdown.
pub fn spawn_round_task(state: AppState) -> JoinHandle<()> {
    info!(
        green_secs = state.config.green_secs,
        red_secs = state.config.red_secs,
        "autopilot round driver configured"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Consume the immediate first tick so the countdown starts one full
        // second after spawn.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let mut session = state.game.write().await;
            tick(&mut session, &state.config);
        }
    })
}

/// One autopilot second: count the phase down, flip at zero.
pub(crate) fn tick(session: &mut GameSession, config: &GameConfig) {
    if !session.mode.is_running() {
        return;
    }

    if session.interval_remaining > 1 {
        session.interval_remaining -= 1;
        return;
    }

    let next = session.mode.toggled();
    session.mode = next;
    session.interval_remaining = config.phase_secs(next);
    debug!(mode = %next, "autopilot phase flip");
}

/// Begin a fresh round: GREEN, full countdown, elapsed clock reset.
pub fn start_round_at(session: &mut GameSession, config: &GameConfig, now: Instant) {
    session.mode = Mode::Green;
    session.interval_remaining = config.phase_secs(Mode::Green);
    session.started_at = Some(now);
    session.flash_until = None;
}

/// `POST /api/start` semantics: no-op while a round is already running.
pub fn start_if_stopped_at(session: &mut GameSession, config: &GameConfig, now: Instant) -> bool {
    if session.mode.is_running() {
        return false;
    }
    start_round_at(session, config, now);
    true
}

/// Client-driven mode write. Re-arms the phase countdown for the new phase;
/// IDLE tears the round down.
pub fn set_mode_at(
    session: &mut GameSession,
    config: &GameConfig,
    mode: Mode,
    now: Instant,
) -> Result<(), RoundError> {
    match mode {
        Mode::GameOver => Err(RoundError::ModeNotSettable),
        Mode::Idle => {
            session.mode = Mode::Idle;
            session.interval_remaining = 0;
            session.started_at = None;
            Ok(())
        }
        running => {
            if session.started_at.is_none() {
                session.started_at = Some(now);
            }
            session.mode = running;
            session.interval_remaining = config.phase_secs(running);
            Ok(())
        }
    }
}

/// A reported penalty raises the flash window; movement during RED ends the
/// game.
pub fn report_penalty_at(session: &mut GameSession, config: &GameConfig, now: Instant) {
    session.flash_until = Some(now + config.penalty_flash);
    if session.mode == Mode::Red {
        session.mode = Mode::GameOver;
        info!("penalty during RED; game over");
    }
}

#[cfg(test)]
#[path = "round_test.rs"]
mod tests;
