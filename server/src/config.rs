//! Environment-driven server configuration.
//!
//! DESIGN
//! ======
//! All knobs come from the environment with tolerant parsing: a missing or
//! malformed variable falls back to the default rather than failing startup.
//! Phase durations default to the original game's cadence (GREEN 5s, RED 4s).

use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GREEN_SECS: u64 = 5;
const DEFAULT_RED_SECS: u64 = 4;
const DEFAULT_AUTOPILOT: bool = true;
const DEFAULT_PENALTY_FLASH_MS: u64 = 800;

/// Tuning knobs for the game server, loaded from environment variables.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Seconds a GREEN phase lasts before the autopilot flips to RED.
    pub green_secs: u64,
    /// Seconds a RED phase lasts before the autopilot flips to GREEN.
    pub red_secs: u64,
    /// Whether the server alternates GREEN/RED on its own.
    pub autopilot: bool,
    /// How long a reported penalty keeps `penalty_flash` raised.
    pub penalty_flash: Duration,
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            green_secs: env_parse("GREEN_SECS", DEFAULT_GREEN_SECS),
            red_secs: env_parse("RED_SECS", DEFAULT_RED_SECS),
            autopilot: env_parse("AUTOPILOT", DEFAULT_AUTOPILOT),
            penalty_flash: Duration::from_millis(env_parse(
                "PENALTY_FLASH_MS",
                DEFAULT_PENALTY_FLASH_MS,
            )),
        }
    }

    /// Configured duration of one phase, in seconds.
    #[must_use]
    pub fn phase_secs(&self, mode: protocol::Mode) -> u64 {
        match mode {
            protocol::Mode::Red => self.red_secs,
            _ => self.green_secs,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            green_secs: DEFAULT_GREEN_SECS,
            red_secs: DEFAULT_RED_SECS,
            autopilot: DEFAULT_AUTOPILOT,
            penalty_flash: Duration::from_millis(DEFAULT_PENALTY_FLASH_MS),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
