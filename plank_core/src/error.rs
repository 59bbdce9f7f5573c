//! Error types for the plank_core library.
//!
//! Only the collaborator edges (config, preferences, catalog construction)
//! produce these. The phase machine, recorder and summary calculator report
//! anomalies as values instead.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for plank_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog construction error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Preferences value error (bad unit, weight, etc.)
    #[error("Preferences error: {0}")]
    Preferences(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
