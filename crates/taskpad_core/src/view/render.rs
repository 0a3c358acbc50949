//! Deterministic markup and statistics derivation.
//!
//! # Responsibility
//! - Turn `(tasks, filter)` into task-list markup.
//! - Compute summary statistics for the header.
//!
//! # Invariants
//! - Every user-supplied string passes through `escape_html` before it is
//!   embedded in markup.
//! - Affordances carry `data-action` / `data-task-id`; markup contains no
//!   inline script.
//! - Functions here are pure; writes happen through `ViewSurface`.

use crate::model::task::{Task, TaskFilter};
use crate::service::task_store::filter_tasks;
use std::fmt::Write;

pub const ACTION_TOGGLE: &str = "toggle";
pub const ACTION_DELETE: &str = "delete";

/// Summary counters derived from the full collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Whole percent in `0..=100`, rounded half up.
    pub progress: u32,
}

impl TaskStats {
    /// CSS width for the progress bar fill.
    pub fn progress_width(&self) -> String {
        format!("{}%", self.progress)
    }
}

/// Computes stats over every task regardless of the active filter.
pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total,
        completed,
        pending: total - completed,
        progress: progress_percent(completed, total),
    }
}

fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // Integer form of round(100 * completed / total) with halves rounded up.
    let percent = (200 * completed + total) / (2 * total);
    u32::try_from(percent).unwrap_or(100)
}

/// Fixed message shown when the filtered view is empty.
pub fn empty_message(filter: TaskFilter) -> &'static str {
    match filter {
        TaskFilter::All => "No tasks yet. Add one above! 👆",
        TaskFilter::Completed => "No completed tasks yet! 📋",
        TaskFilter::Pending => "No pending tasks! Great job! 🎉",
    }
}

/// Renders the task list for the active filter.
pub fn render_task_list(tasks: &[Task], filter: TaskFilter) -> String {
    let visible = filter_tasks(tasks, filter);
    if visible.is_empty() {
        return format!(
            "<div class=\"empty-message\">{}</div>",
            empty_message(filter)
        );
    }

    let mut markup = String::new();
    for task in visible {
        push_task_item(&mut markup, task);
    }
    markup
}

fn push_task_item(out: &mut String, task: &Task) {
    let id = escape_html(task.id.as_str());
    let (item_class, checkbox_class, mark) = if task.completed {
        ("task-item completed", "task-checkbox checked", "✓")
    } else {
        ("task-item", "task-checkbox", "")
    };

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "<div class=\"{item_class}\" data-task-id=\"{id}\">\
<button type=\"button\" class=\"{checkbox_class}\" data-action=\"{ACTION_TOGGLE}\" data-task-id=\"{id}\">{mark}</button>\
<div class=\"task-text\">{text}</div>\
<button type=\"button\" class=\"delete-btn\" data-action=\"{ACTION_DELETE}\" data-task-id=\"{id}\">Delete</button>\
</div>",
        text = escape_html(&task.text),
    );
}

/// Escapes text for safe use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
