//! Task model types and timer arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default category assigned to tasks created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Default pomodoro interval: 25 minutes.
pub const POMODORO_INTERVAL_SECS: i64 = 25 * 60;

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Task has not been started (or was reset).
    #[default]
    Pending,
    /// Task has a running timer.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task's timer has been stopped at least once.
    Completed,
}

impl Status {
    /// Parse a status from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid status.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidStatus> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in progress" | "in-progress" | "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }

    /// Get the canonical string representation of the status.
    ///
    /// These exact strings are persisted in the database and exported to CSV.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl std::fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status: '{}' (must be one of: pending, in progress, completed)",
            self.0
        )
    }
}

impl std::error::Error for InvalidStatus {}

/// A task with an accumulating work timer.
///
/// `time_spent` holds the seconds accumulated across stopped sessions.
/// While the timer runs, `started_at` marks the session start and the
/// live total is `time_spent` plus the elapsed session time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store on creation.
    pub id: i64,
    /// Short title describing the task. Never empty.
    pub title: String,
    /// Grouping category. Defaults to "General".
    pub category: String,
    /// Current status.
    pub status: Status,
    /// Accumulated seconds from stopped sessions. Never negative.
    pub time_spent: i64,
    /// Session start timestamp. Present iff the timer is running.
    pub started_at: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last written.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the timer is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start the timer. No-op if already running: a repeated start must
    /// not reset the session start.
    pub fn start_timer(&mut self) {
        self.start_timer_at(Utc::now());
    }

    /// Start the timer with an explicit clock.
    pub fn start_timer_at(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.status = Status::InProgress;
        }
    }

    /// Stop the timer, folding the elapsed session into `time_spent`.
    /// Silent no-op if not running.
    pub fn stop_timer(&mut self) {
        self.stop_timer_at(Utc::now());
    }

    /// Stop the timer with an explicit clock.
    pub fn stop_timer_at(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at.take() {
            self.time_spent += elapsed_whole_seconds(started, now);
            self.status = Status::Completed;
        }
    }

    /// Reset the timer: zero `time_spent`, clear any running session, and
    /// return the task to `Pending`. Unconditional.
    pub fn reset_timer(&mut self) {
        self.time_spent = 0;
        self.started_at = None;
        self.status = Status::Pending;
    }

    /// Elapsed whole seconds of the current session, or 0 if not running.
    /// Read-only.
    #[must_use]
    pub fn current_session_time(&self) -> i64 {
        self.current_session_time_at(Utc::now())
    }

    /// Current session time with an explicit clock.
    #[must_use]
    pub fn current_session_time_at(&self, now: DateTime<Utc>) -> i64 {
        self.started_at.map_or(0, |started| elapsed_whole_seconds(started, now))
    }

    /// Live total: `time_spent` plus the current session time. Increases
    /// every second while running without requiring a write.
    #[must_use]
    pub fn total_time_seconds(&self) -> i64 {
        self.total_time_seconds_at(Utc::now())
    }

    /// Live total with an explicit clock.
    #[must_use]
    pub fn total_time_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        self.time_spent + self.current_session_time_at(now)
    }

    /// Live total formatted as `HH:MM:SS`.
    #[must_use]
    pub fn total_time_str(&self) -> String {
        format_hms(self.total_time_seconds())
    }

    /// Whether the current session time sits exactly on a positive multiple
    /// of `interval_secs`. Used by the presentation layer to trigger break
    /// reminders; pure read, no state change.
    #[must_use]
    pub fn at_session_milestone_at(&self, now: DateTime<Utc>, interval_secs: i64) -> bool {
        if interval_secs <= 0 {
            return false;
        }
        let session = self.current_session_time_at(now);
        session > 0 && session % interval_secs == 0
    }
}

/// Total `time_spent` for one category, from the aggregate query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Summed `time_spent` over all tasks in the category.
    pub total_seconds: i64,
}

impl CategoryTotal {
    /// Total formatted as `HH:MM:SS`.
    #[must_use]
    pub fn total_time_str(&self) -> String {
        format_hms(self.total_seconds)
    }
}

/// Whole seconds between two instants, floored, clamped to zero so clock
/// skew can never shrink an accumulator.
fn elapsed_whole_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().max(0)
}

/// Format a second count as zero-padded `HH:MM:SS`. Hours are unbounded,
/// not capped at 24.
#[must_use]
pub fn format_hms(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_task() -> Task {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Task {
            id: 1,
            title: "Test".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            status: Status::Pending,
            time_spent: 0,
            started_at: None,
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(Status::from_str("pending").unwrap(), Status::Pending);
        assert_eq!(Status::from_str("Pending").unwrap(), Status::Pending);
        assert_eq!(Status::from_str("In Progress").unwrap(), Status::InProgress);
        assert_eq!(Status::from_str("in-progress").unwrap(), Status::InProgress);
        assert_eq!(Status::from_str("COMPLETED").unwrap(), Status::Completed);
        assert!(Status::from_str("done").is_err());
    }

    #[test]
    fn test_status_as_str_round_trip() {
        for status in [Status::Pending, Status::InProgress, Status::Completed] {
            assert_eq!(Status::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::InProgress.to_string(), "In Progress");
    }

    #[test]
    fn test_invalid_status_display() {
        let err = InvalidStatus("done".to_string());
        assert!(err.to_string().contains("done"));
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn test_start_timer_sets_state() {
        let mut task = sample_task();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();

        task.start_timer_at(now);
        assert_eq!(task.started_at, Some(now));
        assert_eq!(task.status, Status::InProgress);
        assert!(task.is_running());
    }

    #[test]
    fn test_repeated_start_keeps_original_session() {
        let mut task = sample_task();
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
        let later = first + Duration::seconds(90);

        task.start_timer_at(first);
        task.start_timer_at(later);
        assert_eq!(task.started_at, Some(first));
    }

    #[test]
    fn test_stop_timer_accumulates_and_clears() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();

        task.start_timer_at(start);
        task.stop_timer_at(start + Duration::seconds(42));

        assert_eq!(task.time_spent, 42);
        assert_eq!(task.started_at, None);
        assert_eq!(task.status, Status::Completed);
        assert!(!task.is_running());
    }

    #[test]
    fn test_stop_timer_floors_to_whole_seconds() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();

        task.start_timer_at(start);
        task.stop_timer_at(start + Duration::milliseconds(2999));
        assert_eq!(task.time_spent, 2);
    }

    #[test]
    fn test_stop_timer_when_not_running_is_noop() {
        let mut task = sample_task();
        task.time_spent = 10;
        task.status = Status::Completed;

        task.stop_timer_at(Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap());
        assert_eq!(task.time_spent, 10);
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn test_stop_timer_clamps_clock_skew() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();

        task.start_timer_at(start);
        task.stop_timer_at(start - Duration::seconds(5));
        assert_eq!(task.time_spent, 0);
    }

    #[test]
    fn test_multiple_sessions_accumulate() {
        let mut task = sample_task();
        let mut now = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();

        for _ in 0..3 {
            task.start_timer_at(now);
            now += Duration::seconds(10);
            task.stop_timer_at(now);
            now += Duration::seconds(5);
        }
        assert_eq!(task.time_spent, 30);
    }

    #[test]
    fn test_reset_timer_from_any_state() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
        task.time_spent = 500;
        task.start_timer_at(start);

        task.reset_timer();
        assert_eq!(task.time_spent, 0);
        assert_eq!(task.started_at, None);
        assert_eq!(task.status, Status::Pending);
    }

    #[test]
    fn test_current_session_time() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();

        assert_eq!(task.current_session_time_at(start), 0);

        task.start_timer_at(start);
        assert_eq!(task.current_session_time_at(start + Duration::seconds(7)), 7);
    }

    #[test]
    fn test_total_time_is_live_while_running() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
        task.time_spent = 100;
        task.start_timer_at(start);

        assert_eq!(task.total_time_seconds_at(start + Duration::seconds(20)), 120);

        // Monotonically non-decreasing while running
        let mut last = 0;
        for secs in 0..60 {
            let total = task.total_time_seconds_at(start + Duration::seconds(secs));
            assert!(total >= last);
            last = total;
        }
    }

    #[test]
    fn test_total_time_equals_time_spent_when_stopped() {
        let mut task = sample_task();
        task.time_spent = 77;
        assert_eq!(task.total_time_seconds(), 77);
    }

    #[test]
    fn test_session_milestone() {
        let mut task = sample_task();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
        task.start_timer_at(start);

        // Zero session time is not a milestone
        assert!(!task.at_session_milestone_at(start, POMODORO_INTERVAL_SECS));
        assert!(task
            .at_session_milestone_at(start + Duration::seconds(1500), POMODORO_INTERVAL_SECS));
        assert!(!task
            .at_session_milestone_at(start + Duration::seconds(1501), POMODORO_INTERVAL_SECS));
        assert!(task
            .at_session_milestone_at(start + Duration::seconds(3000), POMODORO_INTERVAL_SECS));

        // Stopped task never hits a milestone
        task.stop_timer_at(start + Duration::seconds(1500));
        assert!(!task.at_session_milestone_at(start + Duration::seconds(3000), 1500));
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        // Hours are unbounded, not wrapped at 24
        assert_eq!(format_hms(90 * 3600 + 15), "90:00:15");
    }

    #[test]
    fn test_category_total_formatting() {
        let total = CategoryTotal { category: "Work".to_string(), total_seconds: 3725 };
        assert_eq!(total.total_time_str(), "01:02:05");
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let mut task = sample_task();
        task.start_timer_at(Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap());

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"In Progress\""));
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn format_hms_components_in_range(secs in 0i64..=1_000_000_000) {
                let formatted = format_hms(secs);
                let parts: Vec<&str> = formatted.split(':').collect();
                prop_assert_eq!(parts.len(), 3);
                let minutes: i64 = parts[1].parse().unwrap();
                let seconds: i64 = parts[2].parse().unwrap();
                prop_assert!(minutes < 60);
                prop_assert!(seconds < 60);
            }

            #[test]
            fn format_hms_round_trips(secs in 0i64..=1_000_000_000) {
                let formatted = format_hms(secs);
                let parts: Vec<i64> =
                    formatted.split(':').map(|p| p.parse().unwrap()).collect();
                prop_assert_eq!(parts[0] * 3600 + parts[1] * 60 + parts[2], secs);
            }

            #[test]
            fn stop_never_decreases_time_spent(
                base in 0i64..=1_000_000,
                session in 0i64..=1_000_000,
            ) {
                let mut task = sample_task();
                task.time_spent = base;
                let start = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
                task.start_timer_at(start);
                task.stop_timer_at(start + Duration::seconds(session));
                prop_assert!(task.time_spent >= base);
                prop_assert_eq!(task.time_spent, base + session);
            }
        }
    }
}
