//! Error types for `taskflow`.

/// Errors that can occur in the task tracker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(i64),

    /// Input failed validation before reaching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// A `SQLite` database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
