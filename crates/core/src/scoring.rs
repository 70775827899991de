//! Scoring module - line-clear points, levels and gravity cadence
//!
//! The rules are deliberately small:
//! - Clearing k rows at level L awards `LINE_SCORES[k] * L`.
//! - The level is recomputed from the total line count after every clear.
//! - Gravity speeds up by 50ms per level down to a 100ms floor.

use crate::types::{
    BASE_GRAVITY_MS, GRAVITY_FLOOR_MS, GRAVITY_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
};

/// Points for clearing `lines` rows at `level`.
///
/// Zero lines (or an impossible count above 4) score nothing.
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    LINE_SCORES
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Level for a total number of cleared lines (starts at 1).
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity period in milliseconds for a level.
pub fn gravity_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(GRAVITY_STEP_MS);
    BASE_GRAVITY_MS
        .saturating_sub(speedup)
        .max(GRAVITY_FLOOR_MS)
}
