//! Flat tasks view: every task, always expanded, labelled by full name.

use serde::Serialize;

use super::{PLACEHOLDER_STATE, PreOrder};
use crate::config::DisplayConfig;
use crate::model::TaskState;
use crate::tree::{NodeId, TaskNode, TaskTree};

/// All task nodes in depth-first pre-order, root task included.
///
/// Collapse state is not consulted. The synthetic container is not a task
/// and is never yielded.
pub fn all_task_nodes(tree: &TaskTree) -> impl Iterator<Item = &TaskNode> {
    let starts: Vec<NodeId> = tree.root().children().to_vec();
    PreOrder::new(tree, starts, |_| true)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub key: String,
    /// Full name, e.g. `+basic+parallel_task_foo+bar`
    pub label: String,
    /// Indentation depth (0 = root task)
    pub depth: usize,
    pub state: Option<TaskState>,
    pub parent_key: Option<String>,
    pub upstreams: usize,
    pub is_group: bool,
}

impl TaskRow {
    pub fn from_node(tree: &TaskTree, node: &TaskNode) -> Self {
        let parent_key = tree
            .parent(node)
            .filter(|p| !p.is_synthetic_root())
            .map(|p| p.key().to_string());
        let record = node.record();
        Self {
            key: node.key().to_string(),
            label: node.key().to_string(),
            depth: node.depth().saturating_sub(1),
            state: node.state(),
            parent_key,
            upstreams: record.map_or(0, |r| r.upstreams.len()),
            is_group: record.is_some_and(|r| r.is_group) || node.has_children(),
        }
    }

    pub fn state_label(&self) -> &'static str {
        self.state.as_ref().map_or(PLACEHOLDER_STATE, TaskState::label)
    }
}

pub fn task_rows(tree: &TaskTree) -> Vec<TaskRow> {
    all_task_nodes(tree)
        .map(|node| TaskRow::from_node(tree, node))
        .collect()
}

pub fn render_tasks(tree: &TaskTree, display: &DisplayConfig) -> Vec<String> {
    task_rows(tree)
        .iter()
        .map(|row| {
            let indent = " ".repeat(row.depth * display.indent_width);
            format!("{}{} [{}]", indent, row.label, row.state_label())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collapse::CollapseState;
    use crate::model::TaskRecord;
    use crate::tree::build_task_tree;

    fn record(id: &str, full_name: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            full_name: full_name.to_string(),
            state: TaskState::Success,
            ..TaskRecord::default()
        }
    }

    #[test]
    fn test_includes_root_task_once() {
        let tree = build_task_tree(&[record("1", "+r"), record("2", "+r+a")]).unwrap();
        let keys: Vec<&str> = all_task_nodes(&tree).map(|n| n.key()).collect();
        assert_eq!(keys, vec!["+r", "+r+a"]);
        assert_eq!(all_task_nodes(&tree).filter(|n| n.depth() == 1).count(), 1);
    }

    #[test]
    fn test_never_consults_collapse_state() {
        // all_task_nodes takes no store; the timeline store is irrelevant here
        let tree = build_task_tree(&[
            record("1", "+r"),
            record("2", "+r+a"),
            record("3", "+r+a+x"),
        ])
        .unwrap();
        let mut store = CollapseState::new();
        store.toggle("+r+a");
        assert_eq!(all_task_nodes(&tree).count(), 3);
    }

    #[test]
    fn test_rows_use_full_path_labels() {
        let tree = build_task_tree(&[
            record("1", "+r"),
            record("2", "+r+a"),
            record("3", "+r+a+x"),
        ])
        .unwrap();
        let rows = task_rows(&tree);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["+r", "+r+a", "+r+a+x"]);
        assert_eq!(rows[0].parent_key, None);
        assert_eq!(rows[2].parent_key.as_deref(), Some("+r+a"));
        assert!(rows[1].is_group);
        assert!(!rows[2].is_group);
    }

    #[test]
    fn test_render_tasks_indents_by_depth() {
        let tree = build_task_tree(&[record("1", "+r"), record("2", "+r+a")]).unwrap();
        let display = DisplayConfig {
            indent_width: 4,
            show_times: false,
        };
        assert_eq!(
            render_tasks(&tree, &display),
            vec!["+r [Success]".to_string(), "    +r+a [Success]".to_string()]
        );
    }
}
