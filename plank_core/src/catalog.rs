//! Default exercise catalog.
//!
//! This module provides the built-in plank routine and the accessors the
//! phase machine needs: length, bounds and the mirror flag per position.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with the built-in plank routine
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn exercise(id: u32, name: &str, cues: &[&str], image: &str, can_mirror: bool) -> Exercise {
    Exercise {
        id,
        name: name.into(),
        description: cues.iter().map(|c| (*c).to_string()).collect(),
        image: Some(image.into()),
        can_mirror,
    }
}

fn build_default_catalog_internal() -> Catalog {
    let exercises = vec![
        exercise(
            1,
            "Simple Elbow Plank",
            &[
                "Place your elbows under your shoulders",
                "Keep your body in a straight line from head to heels",
                "Engage your core and glutes",
                "Keep your neck relaxed and gaze down",
            ],
            "/exercises/elbow-plank.png",
            false,
        ),
        exercise(
            2,
            "Slow Mountain Climber",
            &[
                "Start in a high plank with arms straight",
                "Bring one knee toward your chest in a controlled motion",
                "Alternate legs slowly, without rushing",
                "Avoid bouncing or lifting your hips",
            ],
            "/exercises/mountain-climber.png",
            false,
        ),
        exercise(
            3,
            "Plank to Dolphin",
            &[
                "Begin in an elbow plank position",
                "Push your hips upward, forming an inverted V shape",
                "Slowly return to plank with control",
                "Keep your elbows planted throughout, focus on smooth, steady movement",
            ],
            "/exercises/plank-dolphin.png",
            false,
        ),
        exercise(
            4,
            "Single Leg Plank",
            &[
                "Start in an elbow plank",
                "Lift one leg while keeping hips level",
                "Keep your core tight and body aligned",
                "Switch legs when prompted",
            ],
            "/exercises/single-leg-plank.png",
            true,
        ),
        exercise(
            5,
            "Plank Hip Dip",
            &[
                "Hold an elbow plank position",
                "Rotate your hips to one side, lowering toward the floor",
                "Return to center, then rotate to the other side",
                "Keep shoulders stable and controlled, move slowly to maintain balance",
            ],
            "/exercises/hip-dip.png",
            false,
        ),
        exercise(
            6,
            "Side Plank",
            &[
                "Lie on your side with your forearm on the floor",
                "Stack your feet and lift your hips, keeping your body in a straight line",
                "Engage your core to stay balanced and avoid collapsing into the shoulder",
            ],
            "/exercises/side-plank.png",
            true,
        ),
        exercise(
            7,
            "Spiderman Plank",
            &[
                "Start in an elbow plank",
                "Bring one knee outward toward the same-side elbow",
                "Return to plank and alternate sides",
                "Keep your torso stable and avoid rocking side to side",
            ],
            "/exercises/spiderman-plank.png",
            false,
        ),
        exercise(
            8,
            "Single Arm Plank",
            &[
                "Keep your body in a straight line from head to heels.",
                "Support your weight on one straight arm, shoulder stacked over wrist.",
                "Keep the free arm close to your body and engage your core to prevent hip rotation.",
                "Breathe steadily and avoid shifting side to side.",
            ],
            "/exercises/single-arm-plank.png",
            true,
        ),
        exercise(
            9,
            "Commando Plank",
            &[
                "Start in an elbow plank",
                "Push up to a high plank one arm at a time",
                "Lower back down to elbows with control",
                "Alternate the leading arm each time",
            ],
            "/exercises/commando-plank.png",
            false,
        ),
        exercise(
            10,
            "Plank Jacks",
            &[
                "Hold an elbow plank position",
                "Jump your feet out wide then back together, keeping your upper body stable",
                "Land softly and stay controlled",
                "Maintain a steady breathing rhythm",
            ],
            "/exercises/plank-jacks.png",
            false,
        ),
    ];

    Catalog { exercises }
}

impl Catalog {
    /// Build a catalog from an ordered exercise list
    ///
    /// Fails if the list is empty, since the phase machine needs at least one
    /// valid index.
    pub fn new(exercises: Vec<Exercise>) -> Result<Self> {
        if exercises.is_empty() {
            return Err(Error::Catalog("catalog must contain at least one exercise".into()));
        }
        Ok(Self { exercises })
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// True when there are no exercises
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn last_index(&self) -> usize {
        self.exercises.len().saturating_sub(1)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Mirror flag at `index`; out-of-range positions count as not mirrorable
    pub fn can_mirror(&self, index: usize) -> bool {
        self.exercises.get(index).is_some_and(|e| e.can_mirror)
    }
}
