#![forbid(unsafe_code)]

//! Core domain model and workout logic for PlankFlow.
//!
//! This crate provides:
//! - Domain types (exercises, phases, segments, sessions, preferences)
//! - The default exercise catalog and level table
//! - The phase state machine and its effect-running coordinator
//! - Session recording and summary computation
//! - Clock sources and the one-second tick driver
//! - Configuration and preferences persistence

pub mod types;
pub mod error;
pub mod catalog;
pub mod level;
pub mod config;
pub mod logging;
pub mod clock;
pub mod machine;
pub mod recorder;
pub mod summary;
pub mod feedback;
pub mod preferences;
pub mod workout;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use level::{Level, WorkoutConfig};
pub use clock::{Clock, ClockDriver, ManualClock, SystemClock};
pub use machine::{transition, Command, Effect, Input, Transition, WorkoutState};
pub use recorder::SessionRecorder;
pub use summary::compute_summary;
pub use feedback::{FeedbackSink, NullSink, RecordingSink};
pub use workout::Workout;
