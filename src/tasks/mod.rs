//! Task tracking: the task entity, its store, and the controller.

pub mod controller;
pub mod models;
pub mod store;

pub use controller::TaskController;
pub use models::{
    format_hms, CategoryTotal, InvalidStatus, Status, Task, DEFAULT_CATEGORY,
    POMODORO_INTERVAL_SECS,
};
pub use store::{SqliteTaskStore, TaskStore, TaskUpdate};
