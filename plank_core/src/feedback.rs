//! Sound and vibration output port.
//!
//! Feedback is fire-and-forget: sinks may fail, and callers log and drop
//! the error.

use crate::types::{Feedback, Preferences};
use crate::Result;

/// Receives feedback cues
pub trait FeedbackSink {
    fn emit(&mut self, feedback: &Feedback) -> Result<()>;
}

/// Discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    fn emit(&mut self, _feedback: &Feedback) -> Result<()> {
        Ok(())
    }
}

/// Keeps every emitted cue in memory
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub emitted: Vec<Feedback>,
}

impl FeedbackSink for RecordingSink {
    fn emit(&mut self, feedback: &Feedback) -> Result<()> {
        self.emitted.push(feedback.clone());
        Ok(())
    }
}

/// Strip the parts of `feedback` the user has turned off
///
/// Returns `None` when nothing is left to play.
pub fn filter_for(feedback: &Feedback, preferences: &Preferences) -> Option<Feedback> {
    let filtered = Feedback {
        sound: feedback.sound.filter(|_| preferences.sound_enabled),
        vibration: feedback
            .vibration
            .clone()
            .filter(|_| preferences.vibration_enabled),
    };
    (!filtered.is_empty()).then_some(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cue, Vibration};

    #[test]
    fn test_filter_respects_preferences() {
        let feedback = Feedback::new(Cue::Play, Vibration::Pulse(100));
        let mut prefs = Preferences::default();
        assert_eq!(filter_for(&feedback, &prefs), Some(feedback.clone()));

        prefs.sound_enabled = false;
        assert_eq!(
            filter_for(&feedback, &prefs),
            Some(Feedback::vibrate(Vibration::Pulse(100)))
        );

        prefs.vibration_enabled = false;
        assert_eq!(filter_for(&feedback, &prefs), None);
    }

    #[test]
    fn test_vibration_only_dropped_when_disabled() {
        let feedback = Feedback::vibrate(Vibration::Pulse(40));
        let prefs = Preferences {
            vibration_enabled: false,
            ..Preferences::default()
        };
        assert_eq!(filter_for(&feedback, &prefs), None);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.emit(&Feedback::vibrate(Vibration::Pulse(1))).unwrap();
        sink.emit(&Feedback::vibrate(Vibration::Pulse(2))).unwrap();
        assert_eq!(sink.emitted.len(), 2);
        assert_eq!(sink.emitted[1].vibration, Some(Vibration::Pulse(2)));
    }
}
