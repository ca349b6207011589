//! Terminal renderer: one game snapshot in, one ANSI status line out.
//!
//! The colored backgrounds stand in for the CSS classes of the browser
//! variants: green/red for the running phases, yellow for game over, grey for
//! idle. The penalty flash inverts the line for its pulse window.

use protocol::{GameState, Mode};

const RESET: &str = "\x1b[0m";
const REVERSE: &str = "\x1b[7m";

fn mode_color(mode: Mode) -> &'static str {
    match mode {
        Mode::Green => "\x1b[42;30m",
        Mode::Red => "\x1b[41;97m",
        Mode::GameOver => "\x1b[43;30m",
        Mode::Idle => "\x1b[100;97m",
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Green => "GREEN — go!",
        Mode::Red => "RED — freeze!",
        Mode::GameOver => "GAME OVER",
        Mode::Idle => "IDLE",
    }
}

/// Render the current watch line. `flash` inverts the colors for the penalty
/// pulse; a lost connection keeps the previous snapshot visible and appends a
/// marker instead of blanking the display.
pub(crate) fn status_line(state: Option<&GameState>, flash: bool, connected: bool) -> String {
    let Some(state) = state else {
        return String::from("waiting for server...");
    };

    let mut body = format!(" {} ", mode_label(state.mode));
    if let Some(remaining) = state.interval_timer {
        body.push_str(&format!("| next flip {remaining}s "));
    }
    if let Some(elapsed) = state.total_time {
        body.push_str(&format!("| elapsed {elapsed}s "));
    }
    if flash {
        body.push_str("| PENALTY ");
    }

    let mut line = String::new();
    if flash {
        line.push_str(REVERSE);
    }
    line.push_str(mode_color(state.mode));
    line.push_str(&body);
    line.push_str(RESET);
    if !connected {
        line.push_str(" (connection error)");
    }
    line
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
