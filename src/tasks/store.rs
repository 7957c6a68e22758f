//! Task store trait and `SQLite` implementation.

use crate::error::Result;
use crate::tasks::models::{CategoryTotal, Status, Task, DEFAULT_CATEGORY};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Trait for task storage operations.
///
/// All methods return a `Result` and may fail with database errors.
/// Mutating operations commit on success and roll back on failure.
#[allow(clippy::missing_errors_doc)]
pub trait TaskStore {
    /// Create a new task with the given title and category. The store
    /// assigns the id and audit timestamps.
    fn create_task(&self, title: &str, category: &str) -> Result<Task>;

    /// Get a task by id.
    fn get_task(&self, id: i64) -> Result<Option<Task>>;

    /// List all tasks, oldest first.
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// List tasks whose category matches exactly.
    fn list_tasks_by_category(&self, category: &str) -> Result<Vec<Task>>;

    /// Update a task's fields. Returns `None` if the task does not exist.
    fn update_task(&self, id: i64, update: TaskUpdate) -> Result<Option<Task>>;

    /// Delete a task by id. Returns whether a row was removed.
    fn delete_task(&self, id: i64) -> Result<bool>;

    /// Persist an in-memory task's mutable fields verbatim.
    fn save_task(&self, task: &Task) -> Result<()>;

    /// Find the task whose timer is running. If several rows have a
    /// non-null `started_at`, the most recently started wins.
    fn find_running_task(&self) -> Result<Option<Task>>;

    /// Total `time_spent` grouped by category, ordered by category name.
    fn category_totals(&self) -> Result<Vec<CategoryTotal>>;
}

/// Fields that can be updated on a task.
///
/// Only the explicit fields below are writable; anything else (timer
/// state, audit timestamps) changes through dedicated operations.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    /// New title (if Some).
    pub title: Option<String>,
    /// New category (if Some).
    pub category: Option<String>,
    /// New status (if Some).
    pub status: Option<Status>,
}

impl TaskUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none() && self.status.is_none()
    }
}

/// `SQLite`-based task store.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    db_path: PathBuf,
}

const TASK_COLUMNS: &str =
    "id, title, category, status, time_spent, started_at, created_at, updated_at";

impl SqliteTaskStore {
    /// Create a new `SQLite` task store at the given database path.
    ///
    /// The schema is created idempotently if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self { db_path: db_path.as_ref().to_path_buf() };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'General',
                status TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (status IN ('Pending', 'In Progress', 'Completed')),
                time_spent INTEGER NOT NULL DEFAULT 0 CHECK (time_spent >= 0),
                started_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_category ON tasks(category);
            CREATE INDEX IF NOT EXISTS idx_tasks_started_at ON tasks(started_at);
            ",
        )?;

        Ok(())
    }

    /// Parse a task from a row.
    fn parse_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let status_str: String = row.get(3)?;
        let started_at: Option<String> = row.get(5)?;
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;

        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            status: Status::from_str(&status_str).unwrap_or(Status::Pending),
            time_spent: row.get(4)?,
            started_at: started_at.as_deref().map(parse_timestamp),
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }

    fn fetch_task(conn: &Connection, id: i64) -> Result<Option<Task>> {
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                Self::parse_task,
            )
            .optional()?;
        Ok(task)
    }
}

impl TaskStore for SqliteTaskStore {
    fn create_task(&self, title: &str, category: &str) -> Result<Task> {
        let mut conn = self.open()?;
        let category = if category.is_empty() { DEFAULT_CATEGORY } else { category };
        let now = Utc::now();

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (title, category, status, time_spent, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![title, category, Status::Pending.as_str(), now, now],
        )?;
        let id = tx.last_insert_rowid();
        let task = tx.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
            Self::parse_task,
        )?;
        tx.commit()?;

        Ok(task)
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.open()?;
        Self::fetch_task(&conn, id)
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at ASC, id ASC"))?;
        let tasks = stmt.query_map([], Self::parse_task)?.flatten().collect();
        Ok(tasks)
    }

    fn list_tasks_by_category(&self, category: &str) -> Result<Vec<Task>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE category = ?1 ORDER BY created_at ASC, id ASC"
        ))?;
        let tasks = stmt.query_map(params![category], Self::parse_task)?.flatten().collect();
        Ok(tasks)
    }

    fn update_task(&self, id: i64, update: TaskUpdate) -> Result<Option<Task>> {
        if update.is_empty() {
            return self.get_task(id);
        }

        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        if Self::fetch_task(&tx, id)?.is_none() {
            return Ok(None);
        }

        // Build dynamic UPDATE statement
        let mut updates = vec!["updated_at = ?"];
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(Utc::now())];

        if let Some(ref title) = update.title {
            updates.push("title = ?");
            values.push(Box::new(title.clone()));
        }
        if let Some(ref category) = update.category {
            updates.push("category = ?");
            values.push(Box::new(category.clone()));
        }
        if let Some(status) = update.status {
            updates.push("status = ?");
            values.push(Box::new(status.as_str().to_string()));
        }

        values.push(Box::new(id));

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", updates.join(", "));
        let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(AsRef::as_ref).collect();
        tx.execute(&sql, params.as_slice())?;

        let task = Self::fetch_task(&tx, id)?;
        tx.commit()?;

        Ok(task)
    }

    fn delete_task(&self, id: i64) -> Result<bool> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        let rows = tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn save_task(&self, task: &Task) -> Result<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE tasks
             SET title = ?1, category = ?2, status = ?3, time_spent = ?4,
                 started_at = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                task.title,
                task.category,
                task.status.as_str(),
                task.time_spent,
                task.started_at,
                Utc::now(),
                task.id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn find_running_task(&self) -> Result<Option<Task>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE started_at IS NOT NULL"
        ))?;
        let running: Vec<Task> = stmt.query_map([], Self::parse_task)?.flatten().collect();

        // Latest started wins; comparison happens on parsed timestamps, not
        // on the stored text, so mixed legacy formats order correctly.
        Ok(running.into_iter().max_by_key(|t| (t.started_at, t.id)))
    }

    fn category_totals(&self) -> Result<Vec<CategoryTotal>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT category, COALESCE(SUM(time_spent), 0) FROM tasks
             GROUP BY category ORDER BY category ASC",
        )?;
        let totals = stmt
            .query_map([], |row| {
                Ok(CategoryTotal { category: row.get(0)?, total_seconds: row.get(1)? })
            })?
            .flatten()
            .collect();
        Ok(totals)
    }
}

/// Parse a stored timestamp. Columns are written as RFC 3339 UTC; rows
/// from older databases may lack an offset and are interpreted as UTC.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return naive.and_utc();
        }
    }
    // Unparseable text degrades to the epoch rather than poisoning reads.
    DateTime::<Utc>::MIN_UTC
}
