//! Shared wire model for the redlight game API.
//!
//! This crate owns the JSON representation used by both `server` and `cli`.
//! The protocol is deliberately tiny: one snapshot struct read by pollers and
//! one request body for client-driven mode writes. Wire values use the
//! SCREAMING_SNAKE_CASE strings the original HTTP API exposed (`"GREEN"`,
//! `"GAME_OVER"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`Mode`] wire value.
#[derive(Debug, thiserror::Error)]
#[error("invalid mode: {0:?} (expected GREEN, RED, GAME_OVER, or IDLE)")]
pub struct ParseModeError(pub String);

/// Current phase of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Players may move; the round clock is running.
    Green,
    /// Movement is penalized; the round clock is running.
    Red,
    /// A player was eliminated; the round is frozen until restart.
    GameOver,
    /// No round in progress.
    Idle,
}

impl Mode {
    /// True while a round is in progress (the phases the toggle alternates).
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Green | Self::Red)
    }

    /// The opposite running phase. Identity for `GameOver` and `Idle`,
    /// which have no alternation partner.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Green => Self::Red,
            Self::Red => Self::Green,
            other => other,
        }
    }

    /// Wire string for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::GameOver => "GAME_OVER",
            Self::Idle => "IDLE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GREEN" => Ok(Self::Green),
            "RED" => Ok(Self::Red),
            "GAME_OVER" => Ok(Self::GameOver),
            "IDLE" => Ok(Self::Idle),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}

/// Server-reported game snapshot, returned by `GET /api/gamestate`.
///
/// Immutable per fetch; the client never persists it beyond the next poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    pub mode: Mode,
    /// Transient penalty cue; self-clears server-side after a fixed window.
    #[serde(default)]
    pub penalty_flash: bool,
    /// Whole seconds since the round started. `None` when idle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<u64>,
    /// Whole seconds remaining in the current GREEN/RED phase. `None` when
    /// no phase countdown is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_timer: Option<u64>,
}

impl GameState {
    /// Snapshot for a server with no round in progress.
    #[must_use]
    pub fn idle() -> Self {
        Self { mode: Mode::Idle, penalty_flash: false, total_time: None, interval_timer: None }
    }
}

/// Request body for `POST /api/setmode`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SetModeBody {
    /// Requested phase. The server rejects `GAME_OVER` here; eliminations
    /// only happen through the penalty endpoint.
    pub mode: Mode,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
