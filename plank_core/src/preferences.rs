//! Preferences persistence with file locking.
//!
//! Preferences live in one JSON file that is replaced atomically on save.
//! Updates are serialized across processes with a lock on a sidecar file.
//! Also holds the unit conversions and value parsing for the settings.

use crate::{Error, FontStyle, Preferences, Result, Theme, UnitSystem};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;

/// Preferences file inside the data directory
pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join("preferences.json")
}

/// Sidecar file that serializes read-modify-write cycles
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "preferences".into());
    name.push(".lock");
    path.with_file_name(name)
}

/// Read the file under a shared lock; `None` when it cannot be read
fn read_shared(path: &Path) -> Option<String> {
    let attempt = || -> std::io::Result<String> {
        let file = File::open(path)?;
        file.lock_shared()?;
        let mut contents = String::new();
        let read = (&file).read_to_string(&mut contents);
        file.unlock()?;
        read.map(|_| contents)
    };
    match attempt() {
        Ok(contents) => Some(contents),
        Err(e) => {
            tracing::warn!("Unable to read preferences {:?}: {}. Using defaults.", path, e);
            None
        }
    }
}

impl Preferences {
    /// Load preferences, falling back to defaults
    ///
    /// A missing, unreadable or unparsable file yields the defaults; only the
    /// last two are logged.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No preferences at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let Some(contents) = read_shared(path) else {
            return Ok(Self::default());
        };

        Ok(serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Preferences {:?} are corrupt ({}), using defaults", path, e);
            Self::default()
        }))
    }

    /// Write preferences by replacing the file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| Error::Preferences(format!("{:?} has no parent directory", path)))?;
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(temp.as_file_mut(), self)?;
        temp.as_file_mut().flush()?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Load, modify and save back as one step
    ///
    /// An exclusive lock on the sidecar file is held for the whole cycle, so
    /// concurrent updates from other processes are applied one after another.
    /// Nothing is written when `f` fails.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Preferences) -> Result<()>,
    {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let guard = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path(path))?;
        guard.lock_exclusive()?;

        let result = Self::load(path).and_then(|mut prefs| {
            f(&mut prefs)?;
            prefs.save(path)?;
            Ok(prefs)
        });

        guard.unlock()?;
        result
    }

    /// Body weight in the user's unit system
    pub fn display_weight(&self) -> Option<f64> {
        self.weight_kg.map(|kg| match self.unit_system {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg * LB_PER_KG,
        })
    }

    /// Set body weight given in the user's unit system
    pub fn set_weight(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Preferences(format!(
                "weight must be a positive number, got {}",
                value
            )));
        }
        self.weight_kg = Some(match self.unit_system {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => value / LB_PER_KG,
        });
        Ok(())
    }
}

impl UnitSystem {
    pub fn weight_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "metric" | "kg" => Ok(UnitSystem::Metric),
            "imperial" | "lb" | "lbs" => Ok(UnitSystem::Imperial),
            other => Err(Error::Preferences(format!("unknown unit system: {}", other))),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::Preferences(format!("unknown theme: {}", other))),
        }
    }
}

impl FromStr for FontStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(FontStyle::Default),
            "compact" => Ok(FontStyle::Compact),
            other => Err(Error::Preferences(format!("unknown font style: {}", other))),
        }
    }
}

/// Parse an on/off switch value
pub fn parse_toggle(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(Error::Preferences(format!("expected on/off, got {}", other))),
    }
}
