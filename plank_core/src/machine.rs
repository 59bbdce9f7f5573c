//! Workout phase state machine.
//!
//! The machine is a pure transition function: it takes the current
//! [`WorkoutState`] and one [`Input`] (a clock tick or a user command) and
//! returns the next state plus an ordered list of [`Effect`]s. It never
//! touches the recorder or the feedback sink itself; the
//! [`Workout`](crate::workout::Workout) coordinator executes the effects.
//!
//! ## Flow
//!
//! ```text
//! idle -> config -> countdown -> exercise -> break -> exercise ... -> finished
//!   ^                                                                    |
//!   |                        (abort x2)        config <- restart --------+
//!   +-------------------------------------------
//! ```
//!
//! Time-driven transitions fire only on the tick that brings `time_left` to
//! exactly zero while not paused. Within one tick either a phase transition
//! or the halfway side switch can happen, never both.

use crate::level::{Level, WorkoutConfig};
use crate::types::{Catalog, Cue, Feedback, Phase, Side, Vibration};
use serde::{Deserialize, Serialize};

/// `time_left` shown while idle
pub const IDLE_TIME_LEFT: u32 = 5;

/// Final seconds of an exercise that pulse a short vibration
pub const ENDING_WINDOW: u32 = 5;

/// User commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// idle -> config
    Setup,
    /// config -> idle
    ConfigBack,
    /// Choose difficulty while in config
    SetLevel(Level),
    /// config -> countdown
    Begin,
    TogglePause,
    /// Jump to the next exercise
    Skip,
    /// Jump to the previous exercise
    Previous,
    /// First call arms, second call confirms
    Abort,
    CancelAbort,
    /// finished -> config
    Restart,
}

/// Something that drives the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Tick,
    Command(Command),
}

/// Side effect requested by a transition, executed in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    StartSession,
    StartSegment { side: Side, exercise_index: usize },
    EndSegment,
    /// Close any open segment and seal the session
    EndSession,
    DiscardSession,
    PauseRecording,
    ResumeRecording,
    Feedback(Feedback),
}

/// Complete machine state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutState {
    pub phase: Phase,
    pub current_index: usize,
    pub time_left: u32,
    pub is_paused: bool,
    pub confirm_abort: bool,
    pub level: Level,
    pub config: WorkoutConfig,
    /// Exercise index the side switch last fired for
    pub last_switched_index: Option<usize>,
}

impl WorkoutState {
    pub fn new(level: Level, time_scale: f64) -> Self {
        Self {
            phase: Phase::Idle,
            current_index: 0,
            time_left: IDLE_TIME_LEFT,
            is_paused: false,
            confirm_abort: false,
            level,
            config: level.workout_config(time_scale),
            last_switched_index: None,
        }
    }

    /// Whether clock ticks currently advance the machine
    pub fn is_ticking(&self) -> bool {
        self.phase.is_running() && !self.is_paused
    }

    /// Length of the current interval in ticks
    pub fn total_ticks(&self, catalog: &Catalog) -> u32 {
        match self.phase {
            Phase::Exercise => self.config.exercise_ticks(),
            Phase::Break => self.config.break_ticks(self.current_index, catalog.len()),
            _ => self.config.countdown_ticks(),
        }
    }

    /// Fraction of the current interval already elapsed, in [0, 1]
    pub fn progress(&self, catalog: &Catalog) -> f64 {
        if !self.phase.is_running() {
            return 1.0;
        }
        let total = f64::from(self.total_ticks(catalog));
        (1.0 - f64::from(self.time_left) / total).clamp(0.0, 1.0)
    }

    pub fn is_ending(&self) -> bool {
        self.phase == Phase::Exercise && self.time_left > 0 && self.time_left <= ENDING_WINDOW
    }

    /// True once the exercise interval has reached its halfway point
    pub fn is_past_halfway(&self) -> bool {
        if self.phase != Phase::Exercise {
            return false;
        }
        let total = self.config.exercise_ticks();
        let elapsed = total.saturating_sub(self.time_left);
        elapsed * 2 >= total
    }

    /// Exercise to show: the first during countdown, the upcoming one during a break
    pub fn display_index(&self, catalog: &Catalog) -> usize {
        match self.phase {
            Phase::Countdown => 0,
            Phase::Break => (self.current_index + 1).min(catalog.last_index()),
            _ => self.current_index,
        }
    }
}

impl Default for WorkoutState {
    fn default() -> Self {
        Self::new(Level::default(), 1.0)
    }
}

/// Result of one transition
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: WorkoutState,
    pub effects: Vec<Effect>,
}

/// Apply one input to the machine
pub fn transition(state: &WorkoutState, input: Input, catalog: &Catalog) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match input {
        Input::Tick => on_tick(&mut next, catalog, &mut effects),
        Input::Command(command) => on_command(&mut next, command, catalog, &mut effects),
    }

    if next.phase != state.phase {
        tracing::debug!(
            "Phase {:?} -> {:?} (index {}, time_left {})",
            state.phase,
            next.phase,
            next.current_index,
            next.time_left
        );
    }

    Transition {
        state: next,
        effects,
    }
}

fn on_tick(state: &mut WorkoutState, catalog: &Catalog, effects: &mut Vec<Effect>) {
    if !state.is_ticking() {
        return;
    }

    state.time_left = state.time_left.saturating_sub(1);

    if state.time_left == 0 {
        advance_phase(state, catalog, effects);
        return;
    }

    if state.phase == Phase::Exercise {
        if state.is_past_halfway()
            && catalog.can_mirror(state.current_index)
            && state.last_switched_index != Some(state.current_index)
        {
            state.last_switched_index = Some(state.current_index);
            effects.push(Effect::EndSegment);
            effects.push(Effect::StartSegment {
                side: Side::Right,
                exercise_index: state.current_index,
            });
            effects.push(Effect::Feedback(Feedback::new(
                Cue::Switch,
                Vibration::Pattern(vec![60, 40, 60]),
            )));
            tracing::debug!("Side switch at exercise {}", state.current_index);
        }

        if state.is_ending() {
            effects.push(Effect::Feedback(Feedback::vibrate(Vibration::Pulse(40))));
        }
    }
}

/// Fired on the tick that reaches zero
fn advance_phase(state: &mut WorkoutState, catalog: &Catalog, effects: &mut Vec<Effect>) {
    match state.phase {
        Phase::Countdown => {
            enter_exercise(state, catalog, effects);
            effects.push(Effect::Feedback(Feedback::new(Cue::Play, Vibration::Pulse(100))));
        }
        Phase::Exercise if catalog.is_last(state.current_index) => {
            state.phase = Phase::Finished;
            effects.push(Effect::EndSession);
            effects.push(Effect::Feedback(Feedback::new(
                Cue::Success,
                Vibration::Pattern(vec![100, 50, 100]),
            )));
        }
        Phase::Exercise => {
            state.phase = Phase::Break;
            state.time_left = state.config.break_ticks(state.current_index, catalog.len());
            effects.push(Effect::EndSegment);
        }
        Phase::Break => {
            state.current_index += 1;
            enter_exercise(state, catalog, effects);
        }
        Phase::Idle | Phase::Config | Phase::Finished => {}
    }
}

fn enter_exercise(state: &mut WorkoutState, catalog: &Catalog, effects: &mut Vec<Effect>) {
    state.phase = Phase::Exercise;
    state.time_left = state.config.exercise_ticks();
    effects.push(Effect::StartSegment {
        side: Side::opening(catalog.can_mirror(state.current_index)),
        exercise_index: state.current_index,
    });
}

fn on_command(
    state: &mut WorkoutState,
    command: Command,
    catalog: &Catalog,
    effects: &mut Vec<Effect>,
) {
    match (state.phase, command) {
        (Phase::Idle, Command::Setup) => state.phase = Phase::Config,
        (Phase::Config, Command::ConfigBack) => state.phase = Phase::Idle,
        (Phase::Config, Command::SetLevel(level)) => {
            state.level = level;
            state.config = level.workout_config(state.config.time_scale);
        }
        (Phase::Config, Command::Begin) => {
            state.phase = Phase::Countdown;
            state.current_index = 0;
            state.time_left = state.config.countdown_ticks();
            state.is_paused = false;
            state.confirm_abort = false;
            state.last_switched_index = None;
            effects.push(Effect::StartSession);
        }
        (Phase::Finished, Command::Restart) => state.phase = Phase::Config,
        (phase, command) if phase.is_running() => {
            on_running_command(state, command, catalog, effects)
        }
        (phase, command) => {
            tracing::debug!("Ignoring {:?} in phase {:?}", command, phase);
        }
    }
}

fn on_running_command(
    state: &mut WorkoutState,
    command: Command,
    catalog: &Catalog,
    effects: &mut Vec<Effect>,
) {
    match command {
        Command::TogglePause => {
            state.is_paused = !state.is_paused;
            state.confirm_abort = false;
            if state.is_paused {
                effects.push(Effect::PauseRecording);
                effects.push(Effect::Feedback(Feedback::new(Cue::Pause, Vibration::Pulse(50))));
            } else {
                effects.push(Effect::ResumeRecording);
                effects.push(Effect::Feedback(Feedback::new(Cue::Play, Vibration::Pulse(30))));
            }
        }
        Command::Skip if !catalog.is_last(state.current_index) => {
            jump_to(state, state.current_index + 1, catalog, effects);
        }
        Command::Previous if state.current_index > 0 => {
            jump_to(state, state.current_index - 1, catalog, effects);
        }
        Command::Abort if !state.confirm_abort => state.confirm_abort = true,
        Command::Abort => {
            *state = WorkoutState::new(state.level, state.config.time_scale);
            effects.push(Effect::DiscardSession);
            tracing::info!("Workout aborted");
        }
        Command::CancelAbort => state.confirm_abort = false,
        other => tracing::debug!("Ignoring {:?} at exercise {}", other, state.current_index),
    }
}

/// Manual skip/back: the current hold is kept as it stands and the target
/// exercise starts a fresh occurrence.
fn jump_to(state: &mut WorkoutState, index: usize, catalog: &Catalog, effects: &mut Vec<Effect>) {
    let from = state.phase;
    if from == Phase::Exercise {
        effects.push(Effect::EndSegment);
    }
    state.current_index = index;
    state.confirm_abort = false;
    state.last_switched_index = None;
    enter_exercise(state, catalog, effects);
    if from == Phase::Countdown {
        effects.push(Effect::Feedback(Feedback::new(Cue::Play, Vibration::Pulse(100))));
    }
}
