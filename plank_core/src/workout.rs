//! Workout coordinator.
//!
//! Owns the machine state and the session recorder, runs each transition's
//! effects in order, and keeps the sealed session and its summary once the
//! workout finishes. This is the only writer of the session.

use crate::clock::Clock;
use crate::feedback::{filter_for, FeedbackSink};
use crate::level::Level;
use crate::machine::{transition, Effect, Input, WorkoutState};
use crate::recorder::SessionRecorder;
use crate::summary::compute_summary;
use crate::types::{Catalog, Feedback, Phase, Preferences, Session, SessionSummary};

pub struct Workout<'a, C: Clock, S: FeedbackSink> {
    catalog: &'a Catalog,
    state: WorkoutState,
    recorder: SessionRecorder<C>,
    sink: S,
    preferences: Preferences,
    session: Option<Session>,
    summary: Option<SessionSummary>,
}

impl<'a, C: Clock, S: FeedbackSink> Workout<'a, C, S> {
    pub fn new(
        catalog: &'a Catalog,
        state: WorkoutState,
        clock: C,
        sink: S,
        preferences: Preferences,
    ) -> Self {
        Self {
            catalog,
            state,
            recorder: SessionRecorder::new(clock),
            sink,
            preferences,
            session: None,
            summary: None,
        }
    }

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn recorder(&self) -> &SessionRecorder<C> {
        &self.recorder
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    pub fn level(&self) -> Level {
        self.state.level
    }

    /// Sealed session of the last finished workout
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Report of the last finished workout
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Apply one input and run its effects
    ///
    /// Returns the summary when this input finished the workout.
    pub fn handle(&mut self, input: Input) -> Option<SessionSummary> {
        let t = transition(&self.state, input, self.catalog);
        self.state = t.state;

        let mut finished = None;
        for effect in t.effects {
            if let Some(summary) = self.apply(effect) {
                finished = Some(summary);
            }
        }
        finished
    }

    fn apply(&mut self, effect: Effect) -> Option<SessionSummary> {
        match effect {
            Effect::StartSession => {
                self.session = None;
                self.summary = None;
                self.recorder.start_session();
            }
            Effect::StartSegment {
                side,
                exercise_index,
            } => {
                self.recorder.start_segment(side, exercise_index);
            }
            Effect::EndSegment => {
                self.recorder.end_segment();
            }
            Effect::EndSession => return self.seal(),
            Effect::DiscardSession => {
                self.recorder.discard_session();
            }
            Effect::PauseRecording => self.recorder.pause(),
            Effect::ResumeRecording => self.recorder.resume(),
            Effect::Feedback(feedback) => self.emit(&feedback),
        }
        None
    }

    fn seal(&mut self) -> Option<SessionSummary> {
        let Some(session) = self.recorder.end_session() else {
            tracing::warn!("Workout finished with no session: nothing to summarize");
            return None;
        };
        let summary = compute_summary(&session, &self.preferences, self.state.level);
        tracing::info!(
            "Workout complete: {} ms total, longest hold {} ms",
            summary.total_plank_ms,
            summary.longest_hold_ms
        );
        self.session = Some(session);
        self.summary = Some(summary.clone());
        Some(summary)
    }

    fn emit(&mut self, feedback: &Feedback) {
        let Some(feedback) = filter_for(feedback, &self.preferences) else {
            return;
        };
        if let Err(e) = self.sink.emit(&feedback) {
            tracing::debug!("Feedback sink failed: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == Phase::Finished
    }
}
