//! In-memory task store.
//!
//! # Responsibility
//! - Own the ordered task collection and the active filter.
//! - Expose the mutation operations the UI shell may invoke.
//!
//! # Invariants
//! - New tasks are prepended; collection order is most-recent-first.
//! - Ids are unique within the collection.
//! - Lookup misses on toggle/delete are silent no-ops.
//! - This type never persists or renders; `TaskApp` drives that cycle.

use crate::model::task::{Task, TaskFilter, TaskId, TaskValidationError};

/// Ordered task collection plus view filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: TaskFilter,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an already validated collection, filter `all`.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: TaskFilter::All,
        }
    }

    /// Prepends a new pending task.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is empty or whitespace-only; the collection
    ///   is left unchanged.
    pub fn add(&mut self, text: &str) -> Result<TaskId, TaskValidationError> {
        let mut task = Task::new(text)?;
        while self.position(&task.id).is_some() {
            task.id = TaskId::generate();
        }
        let id = task.id.clone();
        self.tasks.insert(0, task);
        Ok(id)
    }

    /// Flips completion on the matching task. Returns `false` on a miss.
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        match self.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    /// Removes the matching task. Returns `false` on a miss.
    ///
    /// Confirmation is the caller's job; see `TaskApp::delete`.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Read-only snapshot of the full collection, in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Tasks visible under the active filter, preserving order.
    pub fn filtered_view(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.filter)
    }

    /// Resolves an id or a unique id prefix to a stored id.
    ///
    /// Returns `None` for unknown or ambiguous prefixes.
    pub fn resolve_id(&self, prefix: &str) -> Option<TaskId> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        let exact = TaskId::from(prefix);
        if self.position(&exact).is_some() {
            return Some(exact);
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|task| task.id.as_str().starts_with(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first.id.clone())
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }
}

/// Filters `tasks` under `filter` without copying records.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}
