//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::cli::{Cli, Command, TaskCommand};
use crate::config::AppConfig;
use crate::event_log;
use crate::export;
use crate::tasks::{format_hms, SqliteTaskStore, Status, Task, TaskController, TaskUpdate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process (0 on success).
    pub exit_code: u8,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

/// Run a CLI command.
pub fn run(cli: Cli) -> CliOutput {
    let config = AppConfig::load().ok().flatten().unwrap_or_default();

    match cli.command {
        Command::Version => run_version(),
        Command::EnsureConfig => run_ensure_config(),
        Command::Task(cmd) => match open_controller(cli.db, &config) {
            Ok(controller) => run_task_cmd(&controller, &config, cmd),
            Err(e) => error_output(e),
        },
        Command::Stats => match open_controller(cli.db, &config) {
            Ok(controller) => run_stats(&controller),
            Err(e) => error_output(e),
        },
        Command::Export { output } => match open_controller(cli.db, &config) {
            Ok(controller) => run_export(&controller, &output),
            Err(e) => error_output(e),
        },
        Command::Watch { ticks } => match open_controller(cli.db, &config) {
            Ok(controller) => run_watch(&controller, &config, ticks),
            Err(e) => error_output(e),
        },
    }
}

fn run_version() -> CliOutput {
    CliOutput {
        exit_code: 0,
        stdout: vec![],
        stderr: vec![format!("taskflow v{}", crate::VERSION)],
    }
}

fn run_ensure_config() -> CliOutput {
    let Some(path) = crate::paths::config_path() else {
        return error_output("could not determine home directory".to_string());
    };
    match AppConfig::ensure(&path) {
        Ok(config) => CliOutput {
            exit_code: 0,
            stdout: vec![],
            stderr: vec![
                format!("Config ensured at {}", path.display()),
                format!("  autosave_interval_secs: {}", config.autosave_interval_secs),
                format!("  pomodoro_interval_secs: {}", config.pomodoro_interval_secs),
            ],
        },
        Err(e) => error_output(format!("Error ensuring config: {e}")),
    }
}

fn run_task_cmd(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    cmd: TaskCommand,
) -> CliOutput {
    match cmd {
        TaskCommand::Create { title, category } => {
            task_create(controller, config, &title, category.as_deref())
        }
        TaskCommand::Get { id } => task_get(controller, id),
        TaskCommand::List { category } => task_list(controller, category.as_deref()),
        TaskCommand::Update { id, title, category, status } => {
            task_update(controller, config, id, title, category, status.as_deref())
        }
        TaskCommand::Delete { id } => task_delete(controller, config, id),
        TaskCommand::Start { id } => task_start(controller, config, id),
        TaskCommand::Stop { id } => task_stop(controller, config, id),
        TaskCommand::Reset { id } => task_reset(controller, config, id),
        TaskCommand::Running => task_running(controller),
    }
}

fn task_create(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    title: &str,
    category: Option<&str>,
) -> CliOutput {
    match controller.create_task(title, category) {
        Ok(task) => {
            event_log::log_operation(
                config,
                "create",
                Some(task.id),
                &format!("title: {}", task.title),
            );
            json_output(&TaskOutput::from_task(&task))
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_get(controller: &TaskController<SqliteTaskStore>, id: i64) -> CliOutput {
    match controller.get_task(id) {
        Ok(task) => json_output(&TaskOutput::from_task(&task)),
        Err(e) => error_output(e.to_string()),
    }
}

fn task_list(controller: &TaskController<SqliteTaskStore>, category: Option<&str>) -> CliOutput {
    let tasks = match category {
        Some(cat) => controller.tasks_by_category(cat),
        None => controller.all_tasks(),
    };
    match tasks {
        Ok(tasks) => {
            let outputs: Vec<TaskOutput> = tasks.iter().map(TaskOutput::from_task).collect();
            json_output(&outputs)
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_update(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    id: i64,
    title: Option<String>,
    category: Option<String>,
    status: Option<&str>,
) -> CliOutput {
    let status = match status.map(Status::from_str).transpose() {
        Ok(s) => s,
        Err(e) => return error_output(e.to_string()),
    };

    let update = TaskUpdate { title, category, status };

    match controller.update_task(id, update) {
        Ok(task) => {
            event_log::log_operation(config, "update", Some(id), "");
            json_output(&TaskOutput::from_task(&task))
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_delete(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    id: i64,
) -> CliOutput {
    match controller.delete_task(id) {
        Ok(()) => {
            event_log::log_operation(config, "delete", Some(id), "");
            success_output(format!("Task deleted: {id}"))
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_start(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    id: i64,
) -> CliOutput {
    // Single-timer discipline lives here, not in the core: stop whatever
    // else is running before starting this task.
    let mut stderr = Vec::new();
    match controller.running_task() {
        Ok(Some(running)) if running.id != id => match controller.stop_timer(running.id) {
            Ok(stopped) => {
                event_log::log_operation(config, "stop", Some(stopped.id), "preempted");
                stderr.push(format!(
                    "Stopped running task {} ({})",
                    stopped.id, stopped.title
                ));
            }
            Err(e) => return error_output(e.to_string()),
        },
        Ok(_) => {}
        Err(e) => return error_output(e.to_string()),
    }

    match controller.start_timer(id) {
        Ok(task) => {
            event_log::log_operation(config, "start", Some(id), "");
            let mut output = json_output(&TaskOutput::from_task(&task));
            output.stderr = stderr;
            output
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_stop(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    id: i64,
) -> CliOutput {
    match controller.stop_timer(id) {
        Ok(task) => {
            event_log::log_operation(
                config,
                "stop",
                Some(id),
                &format!("time_spent: {}", task.time_spent),
            );
            json_output(&TaskOutput::from_task(&task))
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_reset(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    id: i64,
) -> CliOutput {
    match controller.reset_timer(id) {
        Ok(task) => {
            event_log::log_operation(config, "reset", Some(id), "");
            json_output(&TaskOutput::from_task(&task))
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn task_running(controller: &TaskController<SqliteTaskStore>) -> CliOutput {
    match controller.running_task() {
        Ok(Some(task)) => json_output(&TaskOutput::from_task(&task)),
        Ok(None) => success_output("No task is currently running.".to_string()),
        Err(e) => error_output(e.to_string()),
    }
}

fn run_stats(controller: &TaskController<SqliteTaskStore>) -> CliOutput {
    match controller.category_totals() {
        Ok(totals) => {
            let outputs: Vec<CategoryTotalOutput> = totals
                .iter()
                .map(|t| CategoryTotalOutput {
                    category: t.category.clone(),
                    total_seconds: t.total_seconds,
                    total_time: t.total_time_str(),
                })
                .collect();
            json_output(&outputs)
        }
        Err(e) => error_output(e.to_string()),
    }
}

fn run_export(controller: &TaskController<SqliteTaskStore>, output: &Path) -> CliOutput {
    let tasks = match controller.all_tasks() {
        Ok(tasks) => tasks,
        Err(e) => return error_output(e.to_string()),
    };
    match export::export_tasks_to_path(&tasks, output) {
        Ok(()) => success_output(format!(
            "Exported {} task(s) to {}",
            tasks.len(),
            output.display()
        )),
        Err(e) => error_output(e.to_string()),
    }
}

/// Follow the running task, ticking once per second.
///
/// Unlike the other commands this one streams: each tick prints a status
/// line to stderr directly, saves progress whenever the session time is a
/// multiple of the autosave interval, and prints a break reminder at
/// pomodoro milestones.
fn run_watch(
    controller: &TaskController<SqliteTaskStore>,
    config: &AppConfig,
    ticks: Option<u64>,
) -> CliOutput {
    let task = match controller.running_task() {
        Ok(Some(task)) => task,
        Ok(None) => return success_output("No task is currently running.".to_string()),
        Err(e) => return error_output(e.to_string()),
    };

    let mut remaining = ticks;
    loop {
        if let Some(ref mut n) = remaining {
            if *n == 0 {
                break;
            }
            *n -= 1;
        }
        std::thread::sleep(std::time::Duration::from_secs(1));
        let now = Utc::now();

        let session = task.current_session_time_at(now);
        eprintln!(
            "Active task: {} - {}",
            task.title,
            format_hms(task.total_time_seconds_at(now))
        );

        if session > 0 && session % config.autosave_interval_secs.max(1) == 0 {
            if let Err(e) = controller.save_progress(&task) {
                return error_output(e.to_string());
            }
        }

        if task.at_session_milestone_at(now, config.pomodoro_interval_secs) {
            eprintln!(
                "Break time! You have worked on \"{}\" for {} minutes.",
                task.title,
                session / 60
            );
        }
    }

    CliOutput { exit_code: 0, stdout: vec![], stderr: vec![] }
}

fn open_controller(
    db_override: Option<PathBuf>,
    config: &AppConfig,
) -> Result<TaskController<SqliteTaskStore>, String> {
    let db_path = db_override
        .or_else(|| config.db_path.clone())
        .or_else(crate::paths::db_path)
        .ok_or_else(|| "could not determine home directory".to_string())?;
    let store = SqliteTaskStore::new(db_path).map_err(|e| e.to_string())?;
    Ok(TaskController::new(store))
}

fn json_output<T: Serialize>(value: &T) -> CliOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CliOutput { exit_code: 0, stdout: vec![json], stderr: vec![] },
        Err(e) => error_output(e.to_string()),
    }
}

fn success_output(message: String) -> CliOutput {
    CliOutput { exit_code: 0, stdout: vec![message], stderr: vec![] }
}

fn error_output(message: String) -> CliOutput {
    CliOutput { exit_code: 1, stdout: vec![], stderr: vec![message] }
}

// === Output Types ===

/// Task representation for CLI output.
#[derive(Debug, Serialize)]
struct TaskOutput {
    id: i64,
    title: String,
    category: String,
    status: &'static str,
    time_spent: i64,
    time_spent_human: String,
    running: bool,
    started_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskOutput {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            category: task.category.clone(),
            status: task.status.as_str(),
            time_spent: task.time_spent,
            time_spent_human: task.total_time_str(),
            running: task.is_running(),
            started_at: task.started_at,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Per-category total for `stats`.
#[derive(Debug, Serialize)]
struct CategoryTotalOutput {
    category: String,
    total_seconds: i64,
    total_time: String,
}
