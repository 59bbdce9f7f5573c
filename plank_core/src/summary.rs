//! Post-session summary.
//!
//! A pure reduction of a sealed session into total hold time, longest hold
//! and a MET-based calorie estimate.

use crate::level::Level;
use crate::types::{Preferences, Session, SessionSummary};

/// Metabolic equivalent for plank holds
pub const BASE_MET: f64 = 3.3;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Calorie multiplier keyed by level value; unknown levels use 1.0
fn difficulty_multiplier(level: Level) -> f64 {
    match level.value() {
        1 => 0.8,
        2 => 0.9,
        3 => 1.0,
        4 => 1.15,
        5 => 1.3,
        _ => 1.0,
    }
}

/// Estimated calories for `total_ms` of holding at `weight_kg`
pub fn estimate_calories(total_ms: u64, weight_kg: f64, level: Level) -> u32 {
    let hours = total_ms as f64 / MS_PER_HOUR;
    let calories = (BASE_MET * difficulty_multiplier(level) * weight_kg * hours).round();
    if calories.is_finite() && calories > 0.0 {
        calories as u32
    } else {
        0
    }
}

/// Reduce a sealed session into its report
///
/// Calories are omitted when the body weight is unknown or not positive.
pub fn compute_summary(session: &Session, preferences: &Preferences, level: Level) -> SessionSummary {
    let total_plank_ms = session.total_ms();
    let longest_hold_ms = session
        .segments()
        .iter()
        .map(|s| s.duration_ms)
        .max()
        .unwrap_or(0);

    let calories = preferences
        .weight_kg
        .filter(|w| w.is_finite() && *w > 0.0)
        .map(|w| estimate_calories(total_plank_ms, w, level));

    SessionSummary {
        total_plank_ms,
        longest_hold_ms,
        calories,
    }
}
