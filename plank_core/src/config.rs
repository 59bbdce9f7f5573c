//! Configuration file support for PlankFlow.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/plankflow/config.toml`.

use crate::{Error, Level, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub workout: WorkoutDefaults,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Workout defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutDefaults {
    #[serde(default)]
    pub default_level: Level,

    /// Multiplier for every interval; values below 1.0 speed the workout up
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl Default for WorkoutDefaults {
    fn default() -> Self {
        Self {
            default_level: Level::default(),
            time_scale: default_time_scale(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("plankflow")
}

fn default_time_scale() -> f64 {
    1.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("plankflow").join("config.toml")
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        validate_time_scale(self.workout.time_scale)
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

/// A time scale must be a positive, finite multiplier
pub fn validate_time_scale(time_scale: f64) -> Result<()> {
    if time_scale.is_finite() && time_scale > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "time_scale must be a positive number, got {}",
            time_scale
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workout.default_level, Level::default());
        assert_eq!(config.workout.time_scale, 1.0);
        assert!(config.data.data_dir.ends_with("plankflow"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.workout.default_level = Level::new(4).unwrap();
        config.workout.time_scale = 0.5;
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.workout.default_level, config.workout.default_level);
        assert_eq!(parsed.workout.time_scale, 0.5);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[workout]
default_level = 1
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.workout.default_level.value(), 1);
        assert_eq!(config.workout.time_scale, 1.0); // default
    }

    #[test]
    fn test_invalid_level_rejected() {
        let toml_str = r#"
[workout]
default_level = 7
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_invalid_time_scale_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[workout]\ntime_scale = 0.0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
