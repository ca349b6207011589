use super::*;

use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

// =============================================================================
// MOCK API
// =============================================================================

/// Records every attempted mode report; optionally fails them all.
struct MockApi {
    set_modes: Mutex<Vec<Mode>>,
    fail_set_mode: AtomicBool,
}

impl MockApi {
    fn new() -> Arc<Self> {
        Arc::new(Self { set_modes: Mutex::new(Vec::new()), fail_set_mode: AtomicBool::new(false) })
    }

    fn recorded(&self) -> Vec<Mode> {
        self.set_modes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GameApi for MockApi {
    async fn gamestate(&self) -> Result<GameState, ApiError> {
        Ok(GameState::idle())
    }

    async fn set_mode(&self, mode: Mode) -> Result<(), ApiError> {
        self.set_modes.lock().unwrap().push(mode);
        if self.fail_set_mode.load(Ordering::Relaxed) {
            return Err(ApiError::Status { status: 500, path: "/api/setmode" });
        }
        Ok(())
    }

    async fn start(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn restart(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn penalty(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn snapshot(mode: Mode) -> GameState {
    GameState { mode, penalty_flash: false, total_time: Some(1), interval_timer: Some(3) }
}

/// Let detached report tasks run on the current-thread test runtime.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// TOGGLE LIFECYCLE
// =============================================================================

#[tokio::test]
async fn ensure_toggle_is_noop_while_running() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);

    assert!(state.ensure_toggle(Mode::Green));
    assert!(!state.ensure_toggle(Mode::Green));
    assert!(!state.ensure_toggle(Mode::Red));
    assert!(state.toggle_running());
}

#[tokio::test]
async fn stop_toggle_twice_is_noop() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);

    state.ensure_toggle(Mode::Green);
    state.stop_toggle();
    state.stop_toggle();
    assert!(!state.toggle_running());
}

#[tokio::test]
async fn green_red_game_over_sequence_runs_one_toggle() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);
    let now = Instant::now();

    state.apply_at(snapshot(Mode::Green), now);
    assert!(state.toggle_running());
    let generation = state.toggle.as_ref().map(|h| h.generation);

    // RED keeps the same toggle task alive.
    state.apply_at(snapshot(Mode::Red), now + POLL_INTERVAL);
    assert!(state.toggle_running());
    assert_eq!(state.toggle.as_ref().map(|h| h.generation), generation);

    // GAME_OVER stops it.
    state.apply_at(snapshot(Mode::GameOver), now + POLL_INTERVAL * 2);
    assert!(!state.toggle_running());
}

#[tokio::test]
async fn idle_snapshot_stops_toggle() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);

    state.apply_at(snapshot(Mode::Green), Instant::now());
    state.apply_at(GameState::idle(), Instant::now());
    assert!(!state.toggle_running());
}

// =============================================================================
// TOGGLE FLIPS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn toggle_flips_and_reports_every_period() {
    let mock = MockApi::new();
    let mut state = WatchState::new(Arc::clone(&mock) as Arc<dyn GameApi>);

    state.ensure_toggle(Mode::Green);

    tokio::time::sleep(TOGGLE_PERIOD + Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(mock.recorded(), vec![Mode::Red]);

    tokio::time::sleep(TOGGLE_PERIOD).await;
    settle().await;
    assert_eq!(mock.recorded(), vec![Mode::Red, Mode::Green]);
}

#[tokio::test(start_paused = true)]
async fn report_failure_does_not_stop_the_cadence() {
    let mock = MockApi::new();
    mock.fail_set_mode.store(true, Ordering::Relaxed);
    let mut state = WatchState::new(Arc::clone(&mock) as Arc<dyn GameApi>);

    state.ensure_toggle(Mode::Green);

    tokio::time::sleep(TOGGLE_PERIOD * 2 + Duration::from_millis(1)).await;
    settle().await;
    // Both flips were attempted even though every report failed.
    assert_eq!(mock.recorded(), vec![Mode::Red, Mode::Green]);
}

#[tokio::test(start_paused = true)]
async fn stopped_toggle_never_reports_again() {
    let mock = MockApi::new();
    let mut state = WatchState::new(Arc::clone(&mock) as Arc<dyn GameApi>);

    state.ensure_toggle(Mode::Green);
    state.stop_toggle();

    tokio::time::sleep(TOGGLE_PERIOD * 3).await;
    settle().await;
    assert!(mock.recorded().is_empty());
}

// =============================================================================
// PENALTY FLASH
// =============================================================================

#[tokio::test]
async fn flash_clears_after_fixed_window_despite_polls() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);
    let t0 = Instant::now();

    let mut flashing = snapshot(Mode::Green);
    flashing.penalty_flash = true;
    state.apply_at(flashing.clone(), t0);
    assert!(state.flash_active_at(t0 + Duration::from_millis(799)));

    // A repeat `true` inside the window does not extend the pulse.
    state.apply_at(flashing, t0 + Duration::from_millis(300));
    assert!(!state.flash_active_at(t0 + Duration::from_millis(800)));
}

#[tokio::test]
async fn flash_survives_false_polls_inside_window() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);
    let t0 = Instant::now();

    let mut flashing = snapshot(Mode::Green);
    flashing.penalty_flash = true;
    state.apply_at(flashing, t0);

    state.apply_at(snapshot(Mode::Green), t0 + Duration::from_millis(400));
    assert!(state.flash_active_at(t0 + Duration::from_millis(500)));
}

#[tokio::test]
async fn flash_can_rearm_after_expiry() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);
    let t0 = Instant::now();

    let mut flashing = snapshot(Mode::Green);
    flashing.penalty_flash = true;
    state.apply_at(flashing.clone(), t0);

    let t1 = t0 + Duration::from_secs(2);
    state.apply_at(flashing, t1);
    assert!(state.flash_active_at(t1 + Duration::from_millis(700)));
}

// =============================================================================
// POLL FAILURES
// =============================================================================

#[tokio::test]
async fn poll_failure_keeps_previous_state() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);
    let now = Instant::now();

    state.apply_at(snapshot(Mode::Green), now);
    state.on_poll_at(
        Err(ApiError::Status { status: 502, path: "/api/gamestate" }),
        now + POLL_INTERVAL,
    );

    assert_eq!(state.last.as_ref().map(|s| s.mode), Some(Mode::Green));
    assert!(state.toggle_running());
    assert!(!state.connected);
}

#[tokio::test]
async fn successful_poll_restores_connection_marker() {
    let mock = MockApi::new();
    let mut state = WatchState::new(mock);
    let now = Instant::now();

    state.on_poll_at(Err(ApiError::Status { status: 502, path: "/api/gamestate" }), now);
    assert!(!state.connected);

    state.on_poll_at(Ok(snapshot(Mode::Red)), now + POLL_INTERVAL);
    assert!(state.connected);
    assert_eq!(state.last.as_ref().map(|s| s.mode), Some(Mode::Red));
}

// =============================================================================
// IDLE ACTION
// =============================================================================

#[tokio::test]
async fn go_idle_stops_toggle_and_reports_idle() {
    let mock = MockApi::new();
    let mut state = WatchState::new(Arc::clone(&mock) as Arc<dyn GameApi>);

    state.apply_at(snapshot(Mode::Green), Instant::now());
    assert!(state.toggle_running());

    state.go_idle().await;
    assert!(!state.toggle_running());
    assert_eq!(mock.recorded(), vec![Mode::Idle]);
}
