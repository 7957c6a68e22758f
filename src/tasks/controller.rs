//! Task controller: validation, error translation, and timer orchestration.
//!
//! The controller sits between the presentation layer and the store. It
//! validates input before anything reaches the store, translates missing
//! rows into [`Error::NotFound`], and drives the entity's timer methods,
//! persisting after each mutation. It never formats user-facing text.

use crate::error::{Error, Result};
use crate::tasks::models::{CategoryTotal, Task, DEFAULT_CATEGORY};
use crate::tasks::store::{TaskStore, TaskUpdate};

/// Orchestrates task operations against a [`TaskStore`].
#[derive(Debug)]
pub struct TaskController<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskController<S> {
    /// Create a controller over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create a task. The category defaults to "General" when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title is empty; the store is
    /// never touched in that case.
    pub fn create_task(&self, title: &str, category: Option<&str>) -> Result<Task> {
        if title.is_empty() {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
        self.store.create_task(title, category.unwrap_or(DEFAULT_CATEGORY))
    }

    /// Get a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not reference a row.
    pub fn get_task(&self, id: i64) -> Result<Task> {
        self.store.get_task(id)?.ok_or(Error::NotFound(id))
    }

    /// List every task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn all_tasks(&self) -> Result<Vec<Task>> {
        self.store.list_tasks()
    }

    /// List tasks whose category matches exactly. An empty result is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn tasks_by_category(&self, category: &str) -> Result<Vec<Task>> {
        self.store.list_tasks_by_category(category)
    }

    /// Update a task's fields and return the task re-read from the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a title is supplied and empty, and
    /// [`Error::NotFound`] if the id does not exist.
    pub fn update_task(&self, id: i64, update: TaskUpdate) -> Result<Task> {
        if matches!(update.title.as_deref(), Some("")) {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
        self.store.update_task(id, update)?.ok_or(Error::NotFound(id))
    }

    /// Delete a task permanently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        if self.store.delete_task(id)? {
            Ok(())
        } else {
            Err(Error::NotFound(id))
        }
    }

    /// Start a task's timer and return the updated task. Starting an
    /// already-running task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn start_timer(&self, id: i64) -> Result<Task> {
        self.with_task(id, Task::start_timer)
    }

    /// Stop a task's timer, folding the session into `time_spent`, and
    /// return the updated task. Stopping a stopped task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn stop_timer(&self, id: i64) -> Result<Task> {
        self.with_task(id, Task::stop_timer)
    }

    /// Reset a task's timer to zero and return the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id does not exist.
    pub fn reset_timer(&self, id: i64) -> Result<Task> {
        self.with_task(id, Task::reset_timer)
    }

    /// Persist an in-memory task's current state as-is. `time_spent` is
    /// not folded; a running session survives restarts via `started_at`.
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails.
    pub fn save_progress(&self, task: &Task) -> Result<()> {
        self.store.save_task(task)
    }

    /// The task whose timer is running, if any. With several running rows
    /// the most recently started wins.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn running_task(&self) -> Result<Option<Task>> {
        self.store.find_running_task()
    }

    /// Total `time_spent` per category.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn category_totals(&self) -> Result<Vec<CategoryTotal>> {
        self.store.category_totals()
    }

    /// Fetch, mutate, persist, and re-read a task.
    fn with_task(&self, id: i64, mutate: impl FnOnce(&mut Task)) -> Result<Task> {
        let mut task = self.get_task(id)?;
        mutate(&mut task);
        self.store.save_task(&task)?;
        self.get_task(id)
    }
}
