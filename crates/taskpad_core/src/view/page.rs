//! Standalone HTML page composition.
//!
//! `PageSurface` records what the renderer writes and assembles it into a
//! full document with the stats header, progress bar and filter selectors.

use super::render::TaskStats;
use super::ViewSurface;
use crate::model::task::TaskFilter;
use std::fmt::Write;

const PAGE_TITLE: &str = "Simple Task Manager";

/// In-memory surface that keeps the latest rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSurface {
    pub list_markup: String,
    pub stats: TaskStats,
    pub active_filter: TaskFilter,
    /// Number of list writes seen; one per render cycle.
    pub renders: usize,
}

impl PageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full HTML document from the latest writes.
    pub fn to_page(&self) -> String {
        render_page(&self.list_markup, &self.stats, self.active_filter)
    }
}

impl ViewSurface for PageSurface {
    fn write_task_list(&mut self, markup: &str) {
        self.list_markup.clear();
        self.list_markup.push_str(markup);
        self.renders += 1;
    }

    fn write_stats(&mut self, stats: &TaskStats) {
        self.stats = *stats;
    }

    fn mark_active_filter(&mut self, filter: TaskFilter) {
        self.active_filter = filter;
    }
}

/// Wraps already-escaped list markup into a complete page.
pub fn render_page(list_markup: &str, stats: &TaskStats, active: TaskFilter) -> String {
    let mut selectors = String::new();
    for filter in TaskFilter::ALL {
        let class = if filter == active {
            "filter-btn active"
        } else {
            "filter-btn"
        };
        let _ = write!(
            selectors,
            "<button type=\"button\" class=\"{class}\" data-filter=\"{filter}\">{label}</button>",
            label = selector_label(filter),
        );
    }

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head><meta charset=\"utf-8\"><title>{PAGE_TITLE}</title></head>\n\
<body>\n\
<header class=\"stats\">\
<span id=\"totalTasks\">{total}</span>\
<span id=\"completedTasks\">{completed}</span>\
<span id=\"pendingTasks\">{pending}</span>\
<div class=\"progress-bar\"><div id=\"progressFill\" style=\"width: {width}\"></div></div>\
<span id=\"progressText\">{width}</span>\
</header>\n\
<nav class=\"filters\">{selectors}</nav>\n\
<main id=\"taskList\">{list_markup}</main>\n\
</body>\n\
</html>\n",
        total = stats.total,
        completed = stats.completed,
        pending = stats.pending,
        width = stats.progress_width(),
    )
}

fn selector_label(filter: TaskFilter) -> &'static str {
    match filter {
        TaskFilter::All => "All",
        TaskFilter::Completed => "Completed",
        TaskFilter::Pending => "Pending",
    }
}

#[cfg(test)]
mod tests {
    use super::render_page;
    use crate::model::task::TaskFilter;
    use crate::view::render::TaskStats;

    #[test]
    fn exactly_one_selector_is_active() {
        let page = render_page("", &TaskStats::default(), TaskFilter::Pending);
        assert_eq!(page.matches("filter-btn active").count(), 1);
        assert!(page.contains("class=\"filter-btn active\" data-filter=\"pending\""));
    }

    #[test]
    fn progress_width_lands_in_fill_and_text() {
        let stats = TaskStats {
            total: 2,
            completed: 1,
            pending: 1,
            progress: 50,
        };
        let page = render_page("", &stats, TaskFilter::All);
        assert!(page.contains("style=\"width: 50%\""));
        assert!(page.contains("<span id=\"progressText\">50%</span>"));
    }
}
