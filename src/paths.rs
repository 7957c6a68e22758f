//! Path utilities for determining data storage locations.
//!
//! All taskflow data lives in `~/.taskflow/`: the `SQLite` database, the
//! YAML config file, and the optional event log.

use std::path::PathBuf;

/// The base directory name for taskflow data.
const DATA_DIR_NAME: &str = ".taskflow";

/// The database filename.
pub const DATABASE_FILENAME: &str = "taskflow.db";

/// The config filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Get the base data directory for taskflow.
///
/// Returns `~/.taskflow/` or `None` if the home directory cannot be
/// determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Get the database path: `~/.taskflow/taskflow.db`.
#[must_use]
pub fn db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(DATABASE_FILENAME))
}

/// Get the config file path: `~/.taskflow/config.yaml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILENAME))
}
