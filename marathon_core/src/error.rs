//! Error types for the marathon_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for marathon_core operations
///
/// The planning engine itself never fails; these errors come from the
/// boundary code (input parsing, persistence, configuration, export).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A date string that is not strictly `yyyy-MM-dd`
    #[error("Invalid date '{0}': expected yyyy-MM-dd")]
    InvalidDate(String),

    /// User input rejected at the boundary (distance, time, user id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// State management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
