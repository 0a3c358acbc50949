//! Core task list logic for taskpad.
//! This crate is the single source of truth for task invariants; UI shells
//! supply prompts and a display surface and drive everything through
//! `TaskApp`.

pub mod app;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{EventOutcome, Interaction, TaskApp, UiEvent};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{FilterParseError, Task, TaskFilter, TaskId, TaskValidationError};
pub use repo::slot_repo::{RepoError, RepoResult, SlotRepository, SqliteSlotRepository};
pub use service::persistence::{PersistError, TaskPersistence, DEFAULT_SLOT_KEY};
pub use service::task_store::TaskStore;
pub use view::page::{render_page, PageSurface};
pub use view::render::{compute_stats, escape_html, render_task_list, TaskStats};
pub use view::{ViewRenderer, ViewSurface};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
