//! Watch loop: poller, mode toggle timer, and penalty flash tracking.
//!
//! DESIGN
//! ======
//! `WatchState` is the single owned state object threaded through the
//! polling task; there is no module-scoped singleton. Two cadences coexist:
//! the 500ms poller and the 5000ms toggle task. The toggle optimistically
//! alternates GREEN/RED locally and reports each flip fire-and-forget; the
//! local cadence never waits on server acknowledgment.
//!
//! INVARIANT: at most one toggle task is live at a time. Stopping bumps a
//! shared generation counter; the toggle task re-checks its captured
//! generation after every await and exits if stale, so a tick from a stopped
//! timer can never act on behalf of a newer one.
//!
//! ERROR HANDLING
//! ==============
//! Every network failure is logged and dropped. A failed poll leaves the
//! previous snapshot (and the toggle) untouched until the next success; a
//! failed mode report does not disturb subsequent flips.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use protocol::{GameState, Mode};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::{ApiError, GameApi};
use crate::render;

/// Cadence of `GET /api/gamestate`.
const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Cadence of the optimistic GREEN/RED alternation.
const TOGGLE_PERIOD: Duration = Duration::from_millis(5000);
/// How long a single observed `penalty_flash` pulses locally.
const FLASH_WINDOW: Duration = Duration::from_millis(800);

/// Live toggle task. Dropped (and aborted) on stop.
struct ToggleHandle {
    generation: u64,
    task: JoinHandle<()>,
}

/// Owned state of one watch session.
pub(crate) struct WatchState {
    api: Arc<dyn GameApi>,
    toggle: Option<ToggleHandle>,
    generation: Arc<AtomicU64>,
    flash_until: Option<Instant>,
    last: Option<GameState>,
    connected: bool,
}

impl WatchState {
    pub(crate) fn new(api: Arc<dyn GameApi>) -> Self {
        Self {
            api,
            toggle: None,
            generation: Arc::new(AtomicU64::new(0)),
            flash_until: None,
            last: None,
            connected: false,
        }
    }

    /// Start the toggle timer unless one is already running. Returns whether
    /// a new task was spawned.
    pub(crate) fn ensure_toggle(&mut self, initial: Mode) -> bool {
        if self.toggle.is_some() {
            return false;
        }

        let generation = self.generation.load(Ordering::Acquire);
        let task = tokio::spawn(run_toggle(
            Arc::clone(&self.api),
            Arc::clone(&self.generation),
            generation,
            initial,
        ));
        debug!(generation, initial = %initial, "toggle timer started");
        self.toggle = Some(ToggleHandle { generation, task });
        true
    }

    /// Cancel the toggle timer. Idempotent.
    pub(crate) fn stop_toggle(&mut self) {
        let Some(handle) = self.toggle.take() else {
            return;
        };
        // Invalidate before abort: an already in-flight tick sees the bump
        // and exits on its own even if abort loses the race.
        self.generation.fetch_add(1, Ordering::AcqRel);
        handle.task.abort();
        debug!(generation = handle.generation, "toggle timer stopped");
    }

    pub(crate) fn toggle_running(&self) -> bool {
        self.toggle.is_some()
    }

    /// Fold one successful snapshot into the watch state.
    pub(crate) fn apply_at(&mut self, snapshot: GameState, now: Instant) {
        if snapshot.penalty_flash && !self.flash_active_at(now) {
            self.flash_until = Some(now + FLASH_WINDOW);
        }

        if snapshot.mode.is_running() {
            self.ensure_toggle(snapshot.mode);
        } else {
            self.stop_toggle();
        }

        self.connected = true;
        self.last = Some(snapshot);
    }

    /// Fold one poll result into the watch state. Failures keep the previous
    /// visual state; only the connection marker changes.
    pub(crate) fn on_poll_at(&mut self, result: Result<GameState, ApiError>, now: Instant) {
        match result {
            Ok(snapshot) => self.apply_at(snapshot, now),
            Err(e) => {
                warn!(error = %e, "poll failed; keeping previous state");
                self.connected = false;
            }
        }
    }

    /// The one-shot flash pulse self-clears by deadline, regardless of what
    /// later polls report.
    pub(crate) fn flash_active_at(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|until| now < until)
    }

    /// Stop the toggle and ask the server to go idle. Used on exit.
    pub(crate) async fn go_idle(&mut self) {
        self.stop_toggle();
        if let Err(e) = self.api.set_mode(Mode::Idle).await {
            warn!(error = %e, "failed to set idle mode on exit");
        }
    }

    fn line_at(&self, now: Instant) -> String {
        render::status_line(self.last.as_ref(), self.flash_active_at(now), self.connected)
    }
}

/// The repeating GREEN/RED alternation. Each flip is reported in a detached
/// task so a slow or dead server never delays the local cadence.
async fn run_toggle(
    api: Arc<dyn GameApi>,
    shared: Arc<AtomicU64>,
    generation: u64,
    initial: Mode,
) {
    let mut mode = initial;
    loop {
        tokio::time::sleep(TOGGLE_PERIOD).await;
        if shared.load(Ordering::Acquire) != generation {
            return;
        }

        mode = mode.toggled();
        debug!(mode = %mode, "toggle flip");
        let api = Arc::clone(&api);
        tokio::spawn(async move {
            if let Err(e) = api.set_mode(mode).await {
                warn!(error = %e, mode = %mode, "mode report failed; continuing");
            }
        });
    }
}

/// Poll the server every 500ms and render until Ctrl+C.
pub(crate) async fn run(api: Arc<dyn GameApi>, idle_on_exit: bool) {
    let mut state = WatchState::new(api);
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = state.api.gamestate().await;
                let now = Instant::now();
                state.on_poll_at(result, now);
                print!("\r\x1b[2K{}", state.line_at(now));
                let _ = std::io::stdout().flush();
            }
            _ = tokio::signal::ctrl_c() => {
                if idle_on_exit {
                    state.go_idle().await;
                } else {
                    state.stop_toggle();
                }
                println!();
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "watch_test.rs"]
mod tests;
