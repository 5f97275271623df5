//! Scoring module - fixed line-clear table and gravity curve
//!
//! Points depend only on how many rows one lock clears; there are no levels,
//! combos or multipliers. Speed comes from the score alone: the drop interval
//! shrinks linearly with score until it hits a floor.

use crate::types::EngineConfig;

/// Points awarded per lock, indexed by rows cleared (0..=4)
pub const LINE_SCORES: [u32; 5] = [0, 10, 30, 60, 100];

/// Calculate line clear score
///
/// `lines` outside 1..=4 award nothing.
pub fn calculate_line_score(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Seconds between gravity steps at `score`
///
/// `max(min, base - score / speedup_score)`; with the defaults this is
/// `max(0.1, 1 - score / 1000)`.
pub fn drop_interval(score: u32, config: &EngineConfig) -> f32 {
    let raw = config.base_drop_interval - score as f32 / config.speedup_score;
    raw.max(config.min_drop_interval)
}
