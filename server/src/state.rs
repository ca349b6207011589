//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the single in-memory game session behind an `RwLock`; there is no
//! persistence — a restart of the process is a fresh game. Snapshots are
//! computed against an explicit `Instant` so the transient penalty flash and
//! the elapsed clock are derived, never swept by a background task.

use std::sync::Arc;
use std::time::Instant;

use protocol::{GameState, Mode};
use tokio::sync::RwLock;

use crate::config::GameConfig;

// =============================================================================
// GAME SESSION
// =============================================================================

/// The authoritative game state. One per process.
#[derive(Debug)]
pub struct GameSession {
    /// Current phase.
    pub mode: Mode,
    /// Seconds remaining in the current GREEN/RED phase.
    pub interval_remaining: u64,
    /// When the current round started. `None` before the first start.
    pub started_at: Option<Instant>,
    /// Penalty flash stays raised until this deadline.
    pub flash_until: Option<Instant>,
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self { mode: Mode::Idle, interval_remaining: 0, started_at: None, flash_until: None }
    }

    /// Snapshot the session as the wire model, evaluated at `now`.
    #[must_use]
    pub fn snapshot_at(&self, now: Instant) -> GameState {
        let penalty_flash = self.flash_until.is_some_and(|until| now < until);
        let total_time = self
            .started_at
            .filter(|_| self.mode != Mode::Idle)
            .map(|started| now.duration_since(started).as_secs());
        let interval_timer = self.mode.is_running().then_some(self.interval_remaining);

        GameState { mode: self.mode, penalty_flash, total_time, interval_timer }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — the session is Arc-wrapped, the config Copy.
#[derive(Clone)]
pub struct AppState {
    pub game: Arc<RwLock<GameSession>>,
    pub config: GameConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { game: Arc::new(RwLock::new(GameSession::new())), config }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
