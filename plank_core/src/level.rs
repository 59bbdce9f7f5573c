//! Difficulty levels and the timing table they select.
//!
//! Harder levels mean longer holds and shorter rests. The mapping is a fixed
//! table, not a formula.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const EXERCISE_BY_LEVEL: [u32; 5] = [35, 40, 45, 60, 70];
const SHORT_BREAK_BY_LEVEL: [u32; 5] = [20, 18, 15, 12, 10];
const LONG_BREAK_BY_LEVEL: [u32; 5] = [70, 65, 60, 50, 45];

const LEVEL_LABELS: [&str; 5] = ["Beginner", "Novice", "Intermediate", "Advanced", "Expert"];

/// Countdown before the first exercise, in unscaled seconds
pub const COUNTDOWN_SECONDS: u32 = 10;

/// Ordinal difficulty, 0 (Beginner) through 4 (Expert)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::Config(format!(
                "level must be between 0 and {}, got {}",
                Self::MAX,
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        LEVEL_LABELS[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (0..=Self::MAX).map(Level)
    }

    /// Timing table entry for this level at the given time scale
    pub fn workout_config(self, time_scale: f64) -> WorkoutConfig {
        let i = self.0 as usize;
        WorkoutConfig {
            exercise_duration: EXERCISE_BY_LEVEL[i],
            short_break: SHORT_BREAK_BY_LEVEL[i],
            long_break: LONG_BREAK_BY_LEVEL[i],
            time_scale,
        }
    }
}

impl Default for Level {
    /// Intermediate
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// Interval durations for one workout, in seconds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutConfig {
    pub exercise_duration: u32,
    pub short_break: u32,
    pub long_break: u32,
    /// Multiplier applied to every interval; 1.0 is real time
    pub time_scale: f64,
}

impl WorkoutConfig {
    /// Convert configured seconds into a tick count
    ///
    /// Rounds up so a workout never ends fractionally early, and never
    /// yields zero ticks.
    pub fn ticks(&self, seconds: u32) -> u32 {
        let scaled = (f64::from(seconds) * self.time_scale).ceil();
        if scaled.is_finite() && scaled >= 1.0 {
            scaled as u32
        } else {
            1
        }
    }

    pub fn countdown_ticks(&self) -> u32 {
        self.ticks(COUNTDOWN_SECONDS)
    }

    /// At least two ticks, so a mirrored hold always reaches its halfway switch
    pub fn exercise_ticks(&self) -> u32 {
        self.ticks(self.exercise_duration).max(2)
    }

    /// Rest after the exercise at `index`
    ///
    /// The break before the final exercise is the long one.
    pub fn break_ticks(&self, index: usize, exercise_count: usize) -> u32 {
        if exercise_count >= 2 && index == exercise_count - 2 {
            self.ticks(self.long_break)
        } else {
            self.ticks(self.short_break)
        }
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Level::default().workout_config(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table() {
        let expected = [
            (35, 20, 70),
            (40, 18, 65),
            (45, 15, 60),
            (60, 12, 50),
            (70, 10, 45),
        ];
        for (level, (exercise, short, long)) in Level::all().zip(expected) {
            let config = level.workout_config(1.0);
            assert_eq!(config.exercise_duration, exercise);
            assert_eq!(config.short_break, short);
            assert_eq!(config.long_break, long);
        }
    }

    #[test]
    fn test_harder_levels_hold_longer_and_rest_less() {
        let configs: Vec<_> = Level::all().map(|l| l.workout_config(1.0)).collect();
        for pair in configs.windows(2) {
            assert!(pair[1].exercise_duration > pair[0].exercise_duration);
            assert!(pair[1].short_break < pair[0].short_break);
            assert!(pair[1].long_break < pair[0].long_break);
        }
    }

    #[test]
    fn test_level_bounds() {
        assert!(Level::new(4).is_ok());
        assert!(Level::new(5).is_err());
        assert_eq!(Level::default().label(), "Intermediate");
    }

    #[test]
    fn test_level_serde_rejects_out_of_range() {
        let level: Level = serde_json::from_str("3").unwrap();
        assert_eq!(level.value(), 3);
        assert!(serde_json::from_str::<Level>("9").is_err());
    }

    #[test]
    fn test_ticks_round_up() {
        let config = Level::new(2).unwrap().workout_config(0.1);
        // 45 * 0.1 = 4.5 -> 5
        assert_eq!(config.exercise_ticks(), 5);
        assert_eq!(config.countdown_ticks(), 1);

        let tiny = Level::new(0).unwrap().workout_config(0.001);
        assert_eq!(tiny.exercise_ticks(), 2);
        assert_eq!(tiny.countdown_ticks(), 1);
    }

    #[test]
    fn test_long_break_precedes_final_exercise() {
        let config = WorkoutConfig::default();
        for index in 0..8 {
            assert_eq!(config.break_ticks(index, 10), 15);
        }
        assert_eq!(config.break_ticks(8, 10), 60);
    }
}
