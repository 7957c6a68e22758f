//! Task CLI subcommands.

use clap::Subcommand;

/// Task management commands.
///
/// Each task has a title, a category (default "General"), a status, and
/// an accumulating work timer driven by `start` / `stop` / `reset`.
///
/// ## Quick Start
///
/// ```bash
/// # Create a task
/// taskflow task create --title "Write report" --category Work
///
/// # Work on it
/// taskflow task start <id>
/// taskflow task stop <id>
///
/// # See where the time went
/// taskflow stats
/// ```
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Create a new task.
    Create {
        /// Title for the task (required, must be non-empty)
        #[arg(short, long)]
        title: String,

        /// Category for grouping; defaults to "General"
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Get a task by id with full details.
    Get {
        /// Task id
        id: i64,
    },

    /// List tasks, optionally filtered by exact category.
    List {
        /// Only show tasks in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Update a task's fields.
    ///
    /// Only specified fields are updated; others remain unchanged.
    Update {
        /// Task id
        id: i64,

        /// New title (must be non-empty)
        #[arg(short, long)]
        title: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New status: pending, in progress, completed
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Delete a task permanently.
    Delete {
        /// Task id
        id: i64,
    },

    /// Start a task's timer.
    ///
    /// Any other running task is stopped first, so only one timer runs
    /// at a time. Starting an already-running task does nothing.
    Start {
        /// Task id
        id: i64,
    },

    /// Stop a task's timer, adding the session to its accumulated time.
    Stop {
        /// Task id
        id: i64,
    },

    /// Reset a task's timer: zero the accumulated time and return the
    /// task to pending.
    Reset {
        /// Task id
        id: i64,
    },

    /// Show the task whose timer is currently running, if any.
    Running,
}
