//! Core domain types for PlankFlow.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and the catalog they live in
//! - Workout phases and body sides
//! - Recorded segments, sessions and their summary
//! - User preferences consumed by the core
//! - Feedback cues handed to the sound/vibration sink

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// A single exercise in the workout sequence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    /// Form cues, in the order they should be read
    pub description: Vec<String>,
    pub image: Option<String>,
    /// Held once per side, switching at the halfway point
    #[serde(default)]
    pub can_mirror: bool,
}

/// Ordered, immutable exercise sequence. Never empty.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub(crate) exercises: Vec<Exercise>,
}

// ============================================================================
// Phase Types
// ============================================================================

/// Stage of the workout flow
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Config,
    Countdown,
    Exercise,
    Break,
    Finished,
}

impl Phase {
    /// Phases during which the clock counts down
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Countdown | Phase::Exercise | Phase::Break)
    }
}

/// Body side a hold is performed on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Front,
    Left,
    Right,
}

impl Side {
    /// Side of the first segment for an exercise
    pub fn opening(can_mirror: bool) -> Self {
        if can_mirror {
            Side::Left
        } else {
            Side::Front
        }
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// One continuously timed hold
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub side: Side,
    pub duration_ms: u64,
    /// Catalog position the hold belongs to
    pub exercise_index: usize,
}

/// A sealed workout session
///
/// Sessions are produced by the recorder once the workout finishes and
/// cannot be modified afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    segments: Vec<Segment>,
}

impl Session {
    pub fn new(
        id: Uuid,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            id,
            started_at,
            completed_at,
            segments,
        }
    }

    /// Build a session from bare segments, stamped now
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let now = Utc::now();
        Self::new(Uuid::new_v4(), now, now, segments)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Sum of all segment durations
    pub fn total_ms(&self) -> u64 {
        self.segments.iter().map(|s| s.duration_ms).sum()
    }
}

/// Post-workout report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_plank_ms: u64,
    pub longest_hold_ms: u64,
    /// Absent when body weight is unknown
    pub calories: Option<u32>,
}

// ============================================================================
// Preferences
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Default,
    Compact,
}

/// User preferences
///
/// Read-only from the core's perspective. Only `weight_kg` feeds into the
/// summary; the sound and vibration flags gate feedback calls.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub unit_system: UnitSystem,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_style: FontStyle,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            weight_kg: None,
            unit_system: UnitSystem::default(),
            sound_enabled: true,
            vibration_enabled: true,
            theme: Theme::default(),
            font_style: FontStyle::default(),
        }
    }
}

// ============================================================================
// Feedback Types
// ============================================================================

/// Sound cue identifier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Play,
    Pause,
    Success,
    Switch,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Play => "play",
            Cue::Pause => "pause",
            Cue::Success => "success",
            Cue::Switch => "switch",
        }
    }
}

/// Vibration pulse: a single duration or alternating on/off durations (ms)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Vibration {
    Pulse(u32),
    Pattern(Vec<u32>),
}

/// A fire-and-forget feedback request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub sound: Option<Cue>,
    pub vibration: Option<Vibration>,
}

impl Feedback {
    pub fn new(sound: Cue, vibration: Vibration) -> Self {
        Self {
            sound: Some(sound),
            vibration: Some(vibration),
        }
    }

    pub fn vibrate(vibration: Vibration) -> Self {
        Self {
            sound: None,
            vibration: Some(vibration),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.vibration.is_none()
    }
}
