//! Debug operation logging.
//!
//! When `debug_logging` is enabled in the config, every mutating task
//! operation is appended as a JSONL line to `~/.taskflow/task-events.jsonl`.
//! This allows reconstructing what the tracker was asked to do when
//! debugging timer accounting.

use crate::config::AppConfig;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Log file name within the data directory.
const EVENTS_FILE: &str = "task-events.jsonl";

/// Log a task operation if debug logging is enabled.
///
/// Errors are silently ignored — logging must never break an operation.
pub fn log_operation(config: &AppConfig, operation: &str, task_id: Option<i64>, details: &str) {
    if !config.debug_logging {
        return;
    }
    if let Some(dir) = crate::paths::data_dir() {
        log_operation_in(&dir, operation, task_id, details);
    }
}

/// Append an event line under a specific data directory (for testing).
pub fn log_operation_in(data_dir: &Path, operation: &str, task_id: Option<i64>, details: &str) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }

    let entry = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "operation": operation,
        "task_id": task_id,
        "details": details,
    });

    let log_path = data_dir.join(EVENTS_FILE);
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
        let _ = writeln!(file, "{entry}");
    }
}
