//! View layer: markup derivation and display writes.
//!
//! # Responsibility
//! - Derive markup and stats from read-only store snapshots.
//! - Push derived output to a `ViewSurface` owned by the UI shell.
//!
//! # Invariants
//! - No business state is read back from a surface.

pub mod page;
pub mod render;

use crate::model::task::{Task, TaskFilter};
use render::{compute_stats, render_task_list, TaskStats};

/// Display target supplied by the UI shell.
pub trait ViewSurface {
    fn write_task_list(&mut self, markup: &str);
    fn write_stats(&mut self, stats: &TaskStats);
    /// Highlights exactly one filter selector.
    fn mark_active_filter(&mut self, filter: TaskFilter);
}

impl<V: ViewSurface + ?Sized> ViewSurface for &mut V {
    fn write_task_list(&mut self, markup: &str) {
        (**self).write_task_list(markup);
    }

    fn write_stats(&mut self, stats: &TaskStats) {
        (**self).write_stats(stats);
    }

    fn mark_active_filter(&mut self, filter: TaskFilter) {
        (**self).mark_active_filter(filter);
    }
}

/// Renderer bound to one display surface.
pub struct ViewRenderer<V: ViewSurface> {
    surface: V,
}

impl<V: ViewSurface> ViewRenderer<V> {
    pub fn new(surface: V) -> Self {
        Self { surface }
    }

    /// Re-renders the list, the filter selectors and the stats.
    pub fn render(&mut self, tasks: &[Task], filter: TaskFilter) {
        let markup = render_task_list(tasks, filter);
        self.surface.write_task_list(&markup);
        self.surface.mark_active_filter(filter);
        self.render_stats(tasks);
    }

    /// Recomputes stats from the full collection and writes them.
    pub fn render_stats(&mut self, tasks: &[Task]) -> TaskStats {
        let stats = compute_stats(tasks);
        self.surface.write_stats(&stats);
        stats
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }
}
