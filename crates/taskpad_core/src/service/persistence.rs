//! Best-effort task persistence over one durable slot.
//!
//! # Responsibility
//! - Serialize the task collection as a JSON array into a named slot.
//! - Rebuild typed tasks from that slot at startup.
//!
//! # Invariants
//! - `save` and `load` never return an error to the caller.
//! - A missing, unparsable, or invalid slot loads as an empty collection.
//! - Duplicate ids in a stored slot are repaired, never dropped: the first
//!   record keeps its id and later ones get fresh ids.
//! - Log lines carry counts and error kinds only, never task text.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::slot_repo::{RepoError, SlotRepository};
use log::{debug, error, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used when the shell does not configure one.
pub const DEFAULT_SLOT_KEY: &str = "simpleTasks";

/// Failure inside a persistence attempt.
#[derive(Debug)]
pub enum PersistError {
    Repo(RepoError),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    Invalid(TaskValidationError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
            Self::Decode(err) => write!(f, "failed to decode tasks: {err}"),
            Self::Invalid(err) => write!(f, "invalid persisted task: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TaskValidationError> for PersistError {
    fn from(value: TaskValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl PersistError {
    fn code(&self) -> &'static str {
        match self {
            Self::Repo(_) => "slot_io_failed",
            Self::Encode(_) => "encode_failed",
            Self::Decode(_) => "decode_failed",
            Self::Invalid(_) => "invalid_task",
        }
    }
}

/// Persistence adapter bound to one slot key.
pub struct TaskPersistence<R: SlotRepository> {
    repo: R,
    key: String,
}

impl<R: SlotRepository> TaskPersistence<R> {
    /// Creates an adapter using `DEFAULT_SLOT_KEY`.
    pub fn new(repo: R) -> Self {
        Self::with_key(repo, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(repo: R, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes the full collection. Failures are logged and swallowed.
    pub fn save(&self, tasks: &[Task]) {
        match self.try_save(tasks) {
            Ok(()) => debug!(
                "event=tasks_save module=persistence status=ok count={}",
                tasks.len()
            ),
            Err(err) => error!(
                "event=tasks_save module=persistence status=error error_code={} error={err}",
                err.code()
            ),
        }
    }

    /// Reads the collection, or an empty one when the slot is unusable.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(Some(tasks)) => {
                debug!(
                    "event=tasks_load module=persistence status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Ok(None) => {
                debug!("event=tasks_load module=persistence status=empty");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=persistence status=error error_code={} error={err}",
                    err.code()
                );
                Vec::new()
            }
        }
    }

    /// Fallible save used by `save`.
    pub fn try_save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(tasks).map_err(PersistError::Encode)?;
        self.repo.write_slot(&self.key, &encoded)?;
        Ok(())
    }

    /// Fallible load used by `load`. `Ok(None)` means the slot is absent.
    pub fn try_load(&self) -> Result<Option<Vec<Task>>, PersistError> {
        let Some(raw) = self.repo.read_slot(&self.key)? else {
            return Ok(None);
        };
        decode_tasks(&raw).map(Some)
    }
}

/// Decodes and validates a serialized task array.
///
/// Records sharing an id (older builds derived ids from the clock) keep
/// their order; each repeat after the first is given a fresh id.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, PersistError> {
    let mut tasks: Vec<Task> = serde_json::from_str(raw).map_err(PersistError::Decode)?;

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    let mut reassigned = 0usize;
    for task in &mut tasks {
        task.validate()?;
        while seen.contains(&task.id) {
            task.id = TaskId::generate();
            reassigned += 1;
        }
        seen.insert(task.id.clone());
    }
    if reassigned > 0 {
        warn!(
            "event=tasks_load module=persistence status=repaired error_code=duplicate_id reassigned={reassigned}"
        );
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, PersistError};

    #[test]
    fn decode_accepts_browser_date_strings() {
        let raw = r#"[{"id":"1700000000000","text":"buy milk","completed":false,"createdAt":"2023-11-14T22:13:20.000Z"}]"#;
        let tasks = decode_tasks(raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn decode_rejects_blank_text() {
        let raw = r#"[{"id":"a","text":"  ","completed":false,"createdAt":"2023-11-14T22:13:20Z"}]"#;
        assert!(matches!(decode_tasks(raw), Err(PersistError::Invalid(_))));
    }

    #[test]
    fn decode_gives_repeated_ids_fresh_values() {
        let raw = r#"[
            {"id":"a","text":"one","completed":false,"createdAt":"2023-11-14T22:13:20Z"},
            {"id":"a","text":"two","completed":true,"createdAt":"2023-11-14T22:13:21Z"}
        ]"#;
        let tasks = decode_tasks(raw).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id.as_str(), "a");
        assert_eq!(tasks[0].text, "one");
        assert_ne!(tasks[1].id.as_str(), "a");
        assert_eq!(tasks[1].text, "two");
        assert!(tasks[1].completed);
    }

    #[test]
    fn decode_rejects_non_timestamp_created_at() {
        let raw = r#"[{"id":"a","text":"one","completed":false,"createdAt":"yesterday"}]"#;
        assert!(matches!(decode_tasks(raw), Err(PersistError::Decode(_))));
    }
}
