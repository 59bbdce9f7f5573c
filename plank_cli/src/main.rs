use clap::{Parser, Subcommand};
use plank_core::config::validate_time_scale;
use plank_core::preferences::{parse_toggle, preferences_path};
use plank_core::*;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Sender};

/// Upper bound on simulated ticks, so a script that never resumes still ends
const MAX_SIMULATED_TICKS: u32 = 100_000;

#[derive(Parser)]
#[command(name = "plankflow")]
#[command(about = "Guided plank workout timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout (default)
    Start {
        /// Difficulty level, 0 (Beginner) to 4 (Expert)
        #[arg(long)]
        level: Option<u8>,

        /// Multiplier applied to every interval
        #[arg(long)]
        time_scale: Option<f64>,

        /// Run on a virtual clock without waiting in real time
        #[arg(long)]
        simulate: bool,

        /// Commands to inject at tick numbers, e.g. "5:p,8:p,20:n" (with --simulate)
        #[arg(long, requires = "simulate")]
        script: Option<String>,

        /// Print the finished session and summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the level table
    Levels,

    /// Show every exercise with its form cues
    Guide,

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print current preferences
    Show,

    /// Change one or more preferences
    Set {
        /// Body weight, in the active unit system
        #[arg(long, conflicts_with = "clear_weight")]
        weight: Option<f64>,

        /// Forget the stored body weight
        #[arg(long)]
        clear_weight: bool,

        /// metric or imperial
        #[arg(long)]
        units: Option<String>,

        /// on or off
        #[arg(long)]
        sound: Option<String>,

        /// on or off
        #[arg(long)]
        vibration: Option<String>,

        /// light or dark
        #[arg(long)]
        theme: Option<String>,

        /// default or compact
        #[arg(long)]
        font: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    plank_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Start {
            level,
            time_scale,
            simulate,
            script,
            json,
        }) => cmd_start(&data_dir, &config, level, time_scale, simulate, script, json),
        Some(Commands::Levels) => cmd_levels(&config),
        Some(Commands::Guide) => cmd_guide(),
        Some(Commands::Prefs { action }) => cmd_prefs(&data_dir, action),
        None => cmd_start(&data_dir, &config, None, None, false, None, false),
    }
}

fn cmd_start(
    data_dir: &Path,
    config: &Config,
    level: Option<u8>,
    time_scale: Option<f64>,
    simulate: bool,
    script: Option<String>,
    json: bool,
) -> Result<()> {
    let level = match level {
        Some(value) => Level::new(value)?,
        None => config.workout.default_level,
    };
    let time_scale = time_scale.unwrap_or(config.workout.time_scale);
    validate_time_scale(time_scale)?;

    let preferences = Preferences::load(&preferences_path(data_dir))?;
    let catalog = get_default_catalog();
    let state = WorkoutState::new(level, time_scale);

    println!("PlankFlow: {} exercises at {}", catalog.len(), level);

    if simulate {
        let schedule = parse_script(script.as_deref().unwrap_or(""))?;
        let clock = ManualClock::new();
        let mut workout = Workout::new(
            catalog,
            state,
            clock.clone(),
            TerminalSink { bell: false },
            preferences,
        );
        run_simulated(&mut workout, &clock, &schedule)?;
        report(&workout, json)
    } else {
        let mut workout = Workout::new(
            catalog,
            state,
            SystemClock::new(),
            TerminalSink { bell: true },
            preferences,
        );
        run_interactive(&mut workout)?;
        report(&workout, json)
    }
}

/// Drive the workout in real time, reading commands from stdin
fn run_interactive<C: Clock>(workout: &mut Workout<'_, C, TerminalSink>) -> Result<()> {
    let (tx, rx) = channel();
    spawn_stdin_reader(tx);

    println!("Keys (then Enter): p pause/resume, n skip, b back, a abort, c cancel abort");
    workout.handle(Input::Command(Command::Setup));
    workout.handle(Input::Command(Command::Begin));
    announce(workout);

    let mut driver = ClockDriver::new(rx);
    while workout.state().phase.is_running() {
        let Some(input) = driver.next_input(workout.state().is_ticking()) else {
            println!();
            println!("Input closed, stopping workout.");
            break;
        };
        let before = workout.state().clone();
        let jumped = matches!(input, Input::Command(_));
        workout.handle(input);
        if jumped && workout.state().current_index != before.current_index {
            driver.rearm();
        }
        render(workout, &before);
    }
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_key(line.trim()) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        println!("Unknown key '{}'", line.trim());
                    }
                }
            }
        }
    });
}

/// Drive the workout on a virtual clock, one second per tick
fn run_simulated(
    workout: &mut Workout<'_, ManualClock, TerminalSink>,
    clock: &ManualClock,
    schedule: &BTreeMap<u32, Vec<Command>>,
) -> Result<()> {
    workout.handle(Input::Command(Command::Setup));
    workout.handle(Input::Command(Command::Begin));
    announce(workout);

    let mut tick = 0;
    while workout.state().phase.is_running() {
        if tick >= MAX_SIMULATED_TICKS {
            return Err(Error::Other(format!(
                "simulation did not finish within {} ticks",
                MAX_SIMULATED_TICKS
            )));
        }
        for command in schedule.get(&tick).into_iter().flatten() {
            let before = workout.state().clone();
            workout.handle(Input::Command(*command));
            render(workout, &before);
            if !workout.state().phase.is_running() {
                break;
            }
        }
        if !workout.state().phase.is_running() {
            break;
        }

        clock.advance(1000);
        let before = workout.state().clone();
        workout.handle(Input::Tick);
        if before.phase != workout.state().phase || switched_sides(&before, workout.state()) {
            render(workout, &before);
        }
        tick += 1;
    }
    Ok(())
}

/// Parse a script like "5:p,8:p,20:n" into commands keyed by tick number
fn parse_script(script: &str) -> Result<BTreeMap<u32, Vec<Command>>> {
    let mut schedule: BTreeMap<u32, Vec<Command>> = BTreeMap::new();
    for entry in script.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (tick, key) = entry
            .split_once(':')
            .ok_or_else(|| Error::Other(format!("script entry '{}' is not TICK:KEY", entry)))?;
        let tick: u32 = tick
            .trim()
            .parse()
            .map_err(|e| Error::Other(format!("bad tick in '{}': {}", entry, e)))?;
        let command = parse_key(key.trim())
            .ok_or_else(|| Error::Other(format!("unknown key in '{}'", entry)))?;
        schedule.entry(tick).or_default().push(command);
    }
    Ok(schedule)
}

fn parse_key(key: &str) -> Option<Command> {
    match key.to_lowercase().as_str() {
        "p" | "pause" => Some(Command::TogglePause),
        "n" | "skip" => Some(Command::Skip),
        "b" | "back" => Some(Command::Previous),
        "a" | "abort" => Some(Command::Abort),
        "c" | "cancel" => Some(Command::CancelAbort),
        _ => None,
    }
}

/// Print what changed after one input
fn render<C: Clock>(workout: &Workout<'_, C, TerminalSink>, before: &WorkoutState) {
    let state = workout.state();
    if state.phase != before.phase || state.current_index != before.current_index {
        println!();
        announce(workout);
        return;
    }
    if switched_sides(before, state) {
        println!();
        println!("  ⇄ Switch sides!");
    }
    if state.is_paused != before.is_paused {
        println!();
        println!("{}", if state.is_paused { "  ⏸ Paused" } else { "  ▶ Resumed" });
    }
    if state.confirm_abort && !before.confirm_abort {
        println!();
        println!("  Press 'a' again to end the workout, 'c' to continue");
    }
    if state.time_left != before.time_left {
        let side = if state.is_past_halfway() && workout.catalog().can_mirror(state.current_index) {
            " (other side)"
        } else {
            ""
        };
        print!("\r  {:>3}s{}   ", state.time_left, side);
        let _ = io::stdout().flush();
    }
}

/// Whether this step crossed the halfway switch of a mirrored hold
fn switched_sides(before: &WorkoutState, after: &WorkoutState) -> bool {
    after.phase == Phase::Exercise
        && after.last_switched_index.is_some()
        && after.last_switched_index != before.last_switched_index
}

/// Print the header for the phase just entered
fn announce<C: Clock>(workout: &Workout<'_, C, TerminalSink>) {
    let state = workout.state();
    let catalog = workout.catalog();
    let total = catalog.len();
    let shown = catalog.get(state.display_index(catalog));
    let name = shown.map(|e| e.name.as_str()).unwrap_or("?");

    match state.phase {
        Phase::Countdown => {
            println!("Get into position: {} ({}s)", name, state.time_left);
        }
        Phase::Exercise => {
            let mirror = if catalog.can_mirror(state.current_index) {
                ", switch sides halfway"
            } else {
                ""
            };
            println!(
                "[{}/{}] Hold steady: {} ({}s{})",
                state.current_index + 1,
                total,
                name,
                state.time_left,
                mirror
            );
        }
        Phase::Break => {
            println!("Rest {}s. Up next: {}", state.time_left, name);
        }
        Phase::Finished => println!("Workout complete!"),
        Phase::Idle => println!("Workout aborted."),
        Phase::Config => {}
    }
}

/// Print the summary of a finished workout
fn report<C: Clock>(workout: &Workout<'_, C, TerminalSink>, json: bool) -> Result<()> {
    let (Some(session), Some(summary)) = (workout.session(), workout.summary()) else {
        tracing::debug!("No finished session to summarize");
        return Ok(());
    };

    if json {
        let out = serde_json::json!({
            "session": session,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  SESSION SUMMARY");
    println!("╰─────────────────────────────────────────╯");
    println!("  Total plank time: {}", format_ms(summary.total_plank_ms));
    println!("  Longest hold:     {}", format_ms(summary.longest_hold_ms));
    match summary.calories {
        Some(kcal) => println!("  Calories:         ~{} kcal", kcal),
        None => println!(
            "  Calories:         n/a (set your weight with `plankflow prefs set --weight`)"
        ),
    }
    println!("  Segments:         {}", session.segments().len());
    println!(
        "  Started:          {}",
        session.started_at().format("%Y-%m-%d %H:%M")
    );
    println!();
    Ok(())
}

fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn cmd_levels(config: &Config) -> Result<()> {
    println!("Level  Name           Hold  Short rest  Long rest");
    for level in Level::all() {
        let wc = level.workout_config(1.0);
        let marker = if level == config.workout.default_level { "*" } else { " " };
        println!(
            "{}{:<5} {:<14} {:>3}s  {:>9}s  {:>8}s",
            marker,
            level.value(),
            level.label(),
            wc.exercise_duration,
            wc.short_break,
            wc.long_break
        );
    }
    Ok(())
}

fn cmd_guide() -> Result<()> {
    for (i, exercise) in get_default_catalog().exercises().iter().enumerate() {
        let mirror = if exercise.can_mirror { " (both sides)" } else { "" };
        println!("{}. {}{}", i + 1, exercise.name, mirror);
        for cue in &exercise.description {
            println!("   • {}", cue);
        }
        println!();
    }
    Ok(())
}

fn cmd_prefs(data_dir: &Path, action: PrefsAction) -> Result<()> {
    let path = preferences_path(data_dir);
    match action {
        PrefsAction::Show => {
            let prefs = Preferences::load(&path)?;
            display_preferences(&prefs);
        }
        PrefsAction::Set {
            weight,
            clear_weight,
            units,
            sound,
            vibration,
            theme,
            font,
        } => {
            let prefs = Preferences::update(&path, |p| {
                // Units first, so --weight is read in the new system
                if let Some(units) = units {
                    p.unit_system = units.parse()?;
                }
                if let Some(weight) = weight {
                    p.set_weight(weight)?;
                }
                if clear_weight {
                    p.weight_kg = None;
                }
                if let Some(sound) = sound {
                    p.sound_enabled = parse_toggle(&sound)?;
                }
                if let Some(vibration) = vibration {
                    p.vibration_enabled = parse_toggle(&vibration)?;
                }
                if let Some(theme) = theme {
                    p.theme = theme.parse()?;
                }
                if let Some(font) = font {
                    p.font_style = font.parse()?;
                }
                Ok(())
            })?;
            println!("✓ Preferences saved");
            display_preferences(&prefs);
        }
    }
    Ok(())
}

fn display_preferences(prefs: &Preferences) {
    let weight = match prefs.display_weight() {
        Some(w) => format!("{:.1} {}", w, prefs.unit_system.weight_unit()),
        None => "not set".to_string(),
    };
    let on_off = |b: bool| if b { "on" } else { "off" };
    println!("  Weight:    {}", weight);
    println!("  Units:     {:?}", prefs.unit_system);
    println!("  Sound:     {}", on_off(prefs.sound_enabled));
    println!("  Vibration: {}", on_off(prefs.vibration_enabled));
    println!("  Theme:     {:?}", prefs.theme);
    println!("  Font:      {:?}", prefs.font_style);
}

/// Rings the terminal bell for sound cues
struct TerminalSink {
    bell: bool,
}

impl FeedbackSink for TerminalSink {
    fn emit(&mut self, feedback: &Feedback) -> Result<()> {
        if self.bell && feedback.sound.is_some() {
            let mut out = io::stdout();
            write!(out, "\x07")?;
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let schedule = parse_script("5:p, 8:p,20:n,20:b").unwrap();
        assert_eq!(schedule[&5], vec![Command::TogglePause]);
        assert_eq!(schedule[&20], vec![Command::Skip, Command::Previous]);
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script("x:p").is_err());
        assert!(parse_script("3:z").is_err());
        assert!(parse_script("3").is_err());
    }

    #[test]
    fn test_switched_sides_only_on_the_crossing_step() {
        let mut before = WorkoutState::default();
        before.phase = Phase::Exercise;
        before.current_index = 3;
        let mut after = before.clone();
        assert!(!switched_sides(&before, &after));

        after.last_switched_index = Some(3);
        assert!(switched_sides(&before, &after));
        assert!(!switched_sides(&after, &after));
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(450_000), "7:30");
        assert_eq!(format_ms(45_999), "0:45");
    }
}
