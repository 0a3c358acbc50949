//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and the view filter.
//! - Own text validation so every construction path shares one rule.
//!
//! # Invariants
//! - `id` is generated once and never reused for another task.
//! - `text` is stored trimmed and is never empty.
//! - `created_at` is a UTC timestamp, serialized as RFC 3339 text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque task identifier.
///
/// Fresh ids are random UUIDs. Stored ids are kept verbatim so slots written
/// by older builds (numeric timestamp ids) still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace-only.
    EmptyText,
    /// Id is empty.
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::EmptyId => write!(f, "task id must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry.
///
/// Field names on the wire follow the persisted slot format
/// (`id`, `text`, `completed`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyText` when `text` trims to nothing.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), text, Utc::now())
    }

    /// Creates a pending task with caller-provided identity and timestamp.
    pub fn with_id(
        id: TaskId,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// View predicate over the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl TaskFilter {
    /// Every filter, in selector display order.
    pub const ALL: [TaskFilter; 3] = [TaskFilter::All, TaskFilter::Completed, TaskFilter::Pending];

    /// Returns whether `task` is visible under this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a filter name is not one of `all|completed|pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|completed|pending",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for TaskFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskFilter, TaskId, TaskValidationError};

    #[test]
    fn new_trims_text_and_starts_pending() {
        let task = Task::new("  buy milk \n").expect("valid text");
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn new_rejects_whitespace_text() {
        assert_eq!(Task::new(" \t ").unwrap_err(), TaskValidationError::EmptyText);
    }

    #[test]
    fn generated_ids_differ_under_rapid_calls() {
        let ids: std::collections::HashSet<TaskId> =
            (0..1000).map(|_| TaskId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn filter_parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!("Pending".parse::<TaskFilter>().unwrap(), TaskFilter::Pending);
        let err = "done".parse::<TaskFilter>().unwrap_err();
        assert!(err.to_string().contains("`done`"));
    }
}
