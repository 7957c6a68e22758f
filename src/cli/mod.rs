//! Hierarchical CLI for taskflow.
//!
//! Task CRUD and timer commands live under `task`; `stats`, `export`,
//! and `watch` cover the statistics, CSV, and live-timer surfaces.

mod run;
mod task;

pub use run::{run, CliOutput};
pub use task::TaskCommand;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskflow CLI - task tracking with per-task timers.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Task management - create, update, list, and time tasks.
    #[command(subcommand)]
    Task(TaskCommand),

    /// Total time spent per category.
    Stats,

    /// Export all tasks to a CSV file.
    Export {
        /// Path of the CSV file to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Follow the running task: print its live total every second,
    /// autosave progress, and remind about breaks at pomodoro intervals.
    Watch {
        /// Stop after this many ticks instead of running until interrupted
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Show version information.
    Version,

    /// Ensure the config file exists (create with defaults if not).
    #[command(name = "ensure-config")]
    EnsureConfig,
}
