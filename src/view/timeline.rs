//! Collapsible timeline view.
//!
//! Root tasks are never shown and never gate their children. Every other
//! node is shown when all of its ancestors below the root task are expanded.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{PLACEHOLDER_STATE, PreOrder, format_duration};
use crate::collapse::CollapseState;
use crate::config::DisplayConfig;
use crate::model::TaskState;
use crate::tree::{NodeId, TaskNode, TaskTree};

/// Visible timeline nodes in depth-first pre-order, root tasks excluded
pub fn visible_timeline_nodes<'a>(
    tree: &'a TaskTree,
    store: &'a CollapseState,
) -> impl Iterator<Item = &'a TaskNode> + 'a {
    let starts: Vec<NodeId> = tree
        .root_tasks()
        .flat_map(|root_task| root_task.children().iter().copied())
        .collect();
    PreOrder::new(tree, starts, move |node| store.is_expanded(node.key()))
}

/// A display-ready timeline entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub key: String,
    /// Own segment only, e.g. `+bar`
    pub label: String,
    /// Indentation depth (0 = child of the root task)
    pub depth: usize,
    pub state: Option<TaskState>,
    pub expanded: bool,
    pub has_children: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TimelineRow {
    pub fn from_node(node: &TaskNode, store: &CollapseState) -> Self {
        let record = node.record();
        Self {
            key: node.key().to_string(),
            label: node.label(),
            depth: node.depth().saturating_sub(2),
            state: node.state(),
            expanded: store.is_expanded(node.key()),
            has_children: node.has_children(),
            started_at: record.and_then(|r| r.started_at),
            updated_at: record.and_then(|r| r.updated_at),
        }
    }

    pub fn state_label(&self) -> &'static str {
        self.state.as_ref().map_or(PLACEHOLDER_STATE, TaskState::label)
    }

    /// Elapsed time of a finished task
    pub fn duration(&self) -> Option<Duration> {
        let state = self.state?;
        if !state.is_done() {
            return None;
        }
        let (start, end) = (self.started_at?, self.updated_at?);
        (end >= start).then(|| end - start)
    }

    /// `▾` expanded, `▸` collapsed, blank for leaves
    pub fn marker(&self) -> char {
        match (self.has_children, self.expanded) {
            (false, _) => ' ',
            (true, true) => '▾',
            (true, false) => '▸',
        }
    }
}

pub fn timeline_rows(tree: &TaskTree, store: &CollapseState) -> Vec<TimelineRow> {
    visible_timeline_nodes(tree, store)
        .map(|node| TimelineRow::from_node(node, store))
        .collect()
}

/// Plain-text rendering, one line per visible node
pub fn render_timeline(
    tree: &TaskTree,
    store: &CollapseState,
    display: &DisplayConfig,
) -> Vec<String> {
    timeline_rows(tree, store)
        .iter()
        .map(|row| {
            let indent = " ".repeat(row.depth * display.indent_width);
            let mut line = format!("{}{} {} [{}]", indent, row.marker(), row.label, row.state_label());
            if display.show_times
                && let Some(duration) = row.duration()
            {
                line.push_str(&format!(" {}", format_duration(duration.num_seconds())));
            }
            line
        })
        .collect()
}
