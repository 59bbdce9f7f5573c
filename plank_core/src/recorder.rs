//! Session recorder.
//!
//! Accumulates the holds of one workout as an ordered list of segments,
//! measured against a [`Clock`]. Pausing freezes the open segment so paused
//! wall-clock time is never counted as hold time.

use crate::clock::Clock;
use crate::types::{Segment, Session, Side};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A segment still accumulating time
#[derive(Clone, Debug)]
struct OpenSegment {
    side: Side,
    exercise_index: usize,
    accumulated_ms: u64,
    /// Clock reading when accumulation last (re)started; `None` while frozen
    running_since: Option<u64>,
}

impl OpenSegment {
    fn elapsed_ms(&self, now: u64) -> u64 {
        let running = self
            .running_since
            .map(|since| now.saturating_sub(since))
            .unwrap_or(0);
        self.accumulated_ms + running
    }

    fn freeze(&mut self, now: u64) {
        if let Some(since) = self.running_since.take() {
            self.accumulated_ms += now.saturating_sub(since);
        }
    }

    fn thaw(&mut self, now: u64) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }
}

#[derive(Clone, Debug)]
struct ActiveSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    segments: Vec<Segment>,
    open: Option<OpenSegment>,
}

/// Records segments for at most one session at a time
pub struct SessionRecorder<C: Clock> {
    clock: C,
    active: Option<ActiveSession>,
    paused: bool,
}

impl<C: Clock> SessionRecorder<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            active: None,
            paused: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_open_segment(&self) -> bool {
        self.active.as_ref().is_some_and(|s| s.open.is_some())
    }

    /// Segments closed so far in the active session
    pub fn closed_segments(&self) -> &[Segment] {
        self.active
            .as_ref()
            .map(|s| s.segments.as_slice())
            .unwrap_or(&[])
    }

    /// Open a new empty session
    ///
    /// Returns false (and changes nothing) if one is already active.
    pub fn start_session(&mut self) -> bool {
        if self.active.is_some() {
            tracing::warn!("start_session called while a session is already active");
            return false;
        }
        let session = ActiveSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            segments: Vec::new(),
            open: None,
        };
        tracing::info!("Session {} started", session.id);
        self.active = Some(session);
        self.paused = false;
        true
    }

    /// Open a segment for `side`
    ///
    /// Requires an active session with no open segment; returns false otherwise.
    /// A segment opened while paused starts frozen.
    pub fn start_segment(&mut self, side: Side, exercise_index: usize) -> bool {
        let now = self.clock.now_ms();
        let paused = self.paused;
        let Some(session) = self.active.as_mut() else {
            tracing::warn!("start_segment({:?}) without an active session", side);
            return false;
        };
        if session.open.is_some() {
            tracing::warn!("start_segment({:?}) while another segment is open", side);
            return false;
        }
        session.open = Some(OpenSegment {
            side,
            exercise_index,
            accumulated_ms: 0,
            running_since: if paused { None } else { Some(now) },
        });
        tracing::debug!("Segment {:?} opened for exercise {}", side, exercise_index);
        true
    }

    /// Close the open segment and return it
    pub fn end_segment(&mut self) -> Option<Segment> {
        let now = self.clock.now_ms();
        let session = self.active.as_mut()?;
        let open = session.open.take()?;
        let segment = Segment {
            side: open.side,
            duration_ms: open.elapsed_ms(now),
            exercise_index: open.exercise_index,
        };
        tracing::debug!(
            "Segment {:?} closed after {} ms",
            segment.side,
            segment.duration_ms
        );
        session.segments.push(segment.clone());
        Some(segment)
    }

    /// Stop accruing time on the open segment
    pub fn pause(&mut self) {
        let now = self.clock.now_ms();
        self.paused = true;
        if let Some(open) = self.active.as_mut().and_then(|s| s.open.as_mut()) {
            open.freeze(now);
        }
    }

    /// Resume accruing time on the open segment
    pub fn resume(&mut self) {
        let now = self.clock.now_ms();
        self.paused = false;
        if let Some(open) = self.active.as_mut().and_then(|s| s.open.as_mut()) {
            open.thaw(now);
        }
    }

    /// Close any open segment and seal the session
    ///
    /// Returns `None` when no session was active: nothing to summarize.
    pub fn end_session(&mut self) -> Option<Session> {
        self.end_segment();
        let Some(active) = self.active.take() else {
            tracing::warn!("end_session called with no active session");
            return None;
        };
        self.paused = false;
        let session = Session::new(active.id, active.started_at, Utc::now(), active.segments);
        tracing::info!(
            "Session {} sealed with {} segments ({} ms)",
            session.id(),
            session.segments().len(),
            session.total_ms()
        );
        Some(session)
    }

    /// Drop the active session and everything recorded in it
    pub fn discard_session(&mut self) -> bool {
        self.paused = false;
        match self.active.take() {
            Some(session) => {
                tracing::info!(
                    "Session {} discarded ({} segments dropped)",
                    session.id,
                    session.segments.len()
                );
                true
            }
            None => false,
        }
    }
}
