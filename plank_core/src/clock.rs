//! Time sources and the one-second tick driver.
//!
//! The recorder measures holds against a [`Clock`]; the [`ClockDriver`]
//! turns wall-clock time into ticks and interleaves them with user commands.

use crate::machine::{Command, Input};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time, measured from construction
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Explicitly advanced clock
///
/// Clones share the same time, so a test (or the simulated CLI run) can keep
/// one handle and give another to the recorder.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Multiplexes fixed-interval ticks with incoming commands
///
/// Deadlines advance by exactly one interval per tick, so a slow consumer
/// does not make the schedule drift.
pub struct ClockDriver {
    interval: Duration,
    commands: Receiver<Command>,
    next_deadline: Option<Instant>,
}

impl ClockDriver {
    pub fn new(commands: Receiver<Command>) -> Self {
        Self::with_interval(commands, Duration::from_secs(1))
    }

    pub fn with_interval(commands: Receiver<Command>, interval: Duration) -> Self {
        Self {
            interval,
            commands,
            next_deadline: None,
        }
    }

    /// Start a fresh interval from now
    ///
    /// Call when a command jumps to a new interval, so its first tick comes a
    /// full interval later.
    pub fn rearm(&mut self) {
        self.next_deadline = None;
    }

    /// Block until the next tick or command
    ///
    /// `ticking` is whether the machine currently consumes ticks (running and
    /// not paused). While it is false only commands are delivered, and the
    /// next tick is re-armed a full interval after ticking resumes.
    /// Returns `None` once the command channel is closed.
    pub fn next_input(&mut self, ticking: bool) -> Option<Input> {
        if !ticking {
            self.next_deadline = None;
            return self.commands.recv().ok().map(Input::Command);
        }

        let deadline = *self
            .next_deadline
            .get_or_insert_with(|| Instant::now() + self.interval);
        let wait = deadline.saturating_duration_since(Instant::now());

        match self.commands.recv_timeout(wait) {
            Ok(command) => Some(Input::Command(command)),
            Err(RecvTimeoutError::Timeout) => {
                self.next_deadline = Some(deadline + self.interval);
                Some(Input::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
