//! Gravity schedule derived from the game state.

use std::time::Duration;

use blockfall_core::GameState;

/// Gravity period, or `None` while the game is paused or over.
pub fn gravity_period(state: &GameState) -> Option<Duration> {
    state
        .is_running()
        .then(|| Duration::from_millis(state.gravity_interval_ms() as u64))
}

/// What the gravity timer depends on. The timer is re-armed whenever this
/// changes between two processed stimuli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityKey {
    pub level: u32,
    pub running: bool,
    /// Bumped on reset so a fresh game re-arms even at the same level.
    pub generation: u64,
}

impl GravityKey {
    pub fn of(state: &GameState, generation: u64) -> Self {
        Self {
            level: state.level(),
            running: state.is_running(),
            generation,
        }
    }
}
