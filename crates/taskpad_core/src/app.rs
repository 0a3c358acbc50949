//! Mutation-to-render cycle wiring.
//!
//! # Responsibility
//! - Own one store, one persistence adapter and one renderer, all
//!   injected by the UI shell.
//! - Run store mutation, save, then re-render for every user action.
//! - Translate structured `UiEvent` messages into store operations.
//!
//! # Invariants
//! - Every successful task mutation is followed by exactly one save and
//!   one render.
//! - Lookup misses and declined confirmations change nothing and trigger
//!   neither save nor render.
//! - Filter changes re-render but do not persist.

use crate::model::task::{Task, TaskFilter, TaskId, TaskValidationError};
use crate::repo::slot_repo::SlotRepository;
use crate::service::persistence::TaskPersistence;
use crate::service::task_store::TaskStore;
use crate::view::render::{ACTION_DELETE, ACTION_TOGGLE};
use crate::view::{ViewRenderer, ViewSurface};
use log::{debug, info};

pub const EMPTY_TEXT_NOTICE: &str = "Please enter a task!";
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this task?";

/// Blocking user prompts provided by the shell.
pub trait Interaction {
    /// Shows a notice the user must acknowledge.
    fn alert(&mut self, message: &str);
    /// Asks a yes/no question; `true` means proceed.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Structured message from UI controls to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Add(String),
    Toggle(TaskId),
    Delete(TaskId),
    SetFilter(TaskFilter),
}

impl UiEvent {
    /// Maps a rendered affordance (`data-action`, `data-task-id`) back to
    /// an event. Returns `None` for unknown actions.
    pub fn from_affordance(action: &str, task_id: &str) -> Option<Self> {
        match action {
            ACTION_TOGGLE => Some(Self::Toggle(TaskId::from(task_id))),
            ACTION_DELETE => Some(Self::Delete(TaskId::from(task_id))),
            _ => None,
        }
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Added(TaskId),
    Rejected(TaskValidationError),
    Toggled(TaskId),
    Deleted(TaskId),
    /// Delete was not confirmed.
    Declined,
    /// No task with the given id.
    Ignored,
    FilterChanged(TaskFilter),
}

/// Single-session task application.
pub struct TaskApp<R: SlotRepository, V: ViewSurface> {
    store: TaskStore,
    persistence: TaskPersistence<R>,
    renderer: ViewRenderer<V>,
}

impl<R: SlotRepository, V: ViewSurface> TaskApp<R, V> {
    /// Loads persisted tasks and performs the initial render.
    pub fn start(persistence: TaskPersistence<R>, renderer: ViewRenderer<V>) -> Self {
        let store = TaskStore::from_tasks(persistence.load());
        info!(
            "event=app_session_start module=app status=ok slot={} count={}",
            persistence.key(),
            store.tasks().len()
        );
        let mut app = Self {
            store,
            persistence,
            renderer,
        };
        app.render();
        app
    }

    /// Routes one UI event to the matching operation.
    pub fn dispatch(&mut self, event: UiEvent, ui: &mut dyn Interaction) -> EventOutcome {
        match event {
            UiEvent::Add(text) => match self.add(&text, ui) {
                Ok(id) => EventOutcome::Added(id),
                Err(err) => EventOutcome::Rejected(err),
            },
            UiEvent::Toggle(id) => {
                if self.toggle(&id) {
                    EventOutcome::Toggled(id)
                } else {
                    EventOutcome::Ignored
                }
            }
            UiEvent::Delete(id) => {
                if self.store.get(&id).is_none() {
                    return EventOutcome::Ignored;
                }
                if self.delete(&id, ui) {
                    EventOutcome::Deleted(id)
                } else {
                    EventOutcome::Declined
                }
            }
            UiEvent::SetFilter(filter) => {
                self.set_filter(filter);
                EventOutcome::FilterChanged(filter)
            }
        }
    }

    /// Adds a task, or alerts the user when `text` is blank.
    pub fn add(
        &mut self,
        text: &str,
        ui: &mut dyn Interaction,
    ) -> Result<TaskId, TaskValidationError> {
        match self.store.add(text) {
            Ok(id) => {
                debug!(
                    "event=task_add module=app status=ok count={}",
                    self.store.tasks().len()
                );
                self.commit();
                Ok(id)
            }
            Err(err) => {
                debug!("event=task_add module=app status=rejected reason=empty_text");
                ui.alert(EMPTY_TEXT_NOTICE);
                Err(err)
            }
        }
    }

    /// Toggles completion. Returns `false` on a lookup miss.
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        if !self.store.toggle(id) {
            debug!("event=task_toggle module=app status=miss");
            return false;
        }
        self.commit();
        true
    }

    /// Deletes after user confirmation. Returns `true` only if removed.
    ///
    /// The prompt is shown before the lookup; a miss after confirming is
    /// still a silent no-op.
    pub fn delete(&mut self, id: &TaskId, ui: &mut dyn Interaction) -> bool {
        if !ui.confirm(DELETE_CONFIRM_PROMPT) {
            debug!("event=task_delete module=app status=declined");
            return false;
        }
        if !self.store.delete(id) {
            debug!("event=task_delete module=app status=miss");
            return false;
        }
        self.commit();
        true
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.store.set_filter(filter);
        self.render();
    }

    pub fn filtered_view(&self) -> Vec<&Task> {
        self.store.filtered_view()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn surface(&self) -> &V {
        self.renderer.surface()
    }

    fn commit(&mut self) {
        self.persistence.save(self.store.tasks());
        self.render();
    }

    fn render(&mut self) {
        self.renderer.render(self.store.tasks(), self.store.filter());
    }
}
