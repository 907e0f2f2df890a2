//! Projections of a task tree.
//!
//! Both views walk the same [`TaskTree`]; they differ only in where the walk
//! starts, whether it descends into a node, and how a node is labelled.

pub mod tasks;
pub mod timeline;

use crate::tree::{NodeId, TaskNode, TaskTree};

pub use tasks::{TaskRow, all_task_nodes, render_tasks, task_rows};
pub use timeline::{TimelineRow, render_timeline, timeline_rows, visible_timeline_nodes};

/// Label shown for a node that has no record
pub const PLACEHOLDER_STATE: &str = "-";

/// Lazy depth-first, pre-order walk over a task tree.
///
/// `descend` decides whether a yielded node's children are walked. The walk
/// is recomputed from scratch every time one is created.
pub struct PreOrder<'a, F> {
    tree: &'a TaskTree,
    stack: Vec<NodeId>,
    descend: F,
}

impl<'a, F> PreOrder<'a, F>
where
    F: Fn(&TaskNode) -> bool,
{
    /// Start a walk that yields `starts` (and their descendants) in order
    pub fn new(tree: &'a TaskTree, starts: Vec<NodeId>, descend: F) -> Self {
        let mut stack = starts;
        stack.reverse();
        Self {
            tree,
            stack,
            descend,
        }
    }
}

impl<'a, F> Iterator for PreOrder<'a, F>
where
    F: Fn(&TaskNode) -> bool,
{
    type Item = &'a TaskNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id)?;
        if (self.descend)(node) {
            self.stack.extend(node.children().iter().rev().copied());
        }
        Some(node)
    }
}

/// Human-readable duration: `42s`, `3m 5s`, `2h 10m`
pub fn format_duration(secs: i64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {}m", h, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskRecord;
    use crate::tree::build_task_tree;

    fn tree(names: &[&str]) -> TaskTree {
        let records: Vec<TaskRecord> = names
            .iter()
            .enumerate()
            .map(|(i, n)| TaskRecord {
                id: i.to_string(),
                full_name: n.to_string(),
                ..TaskRecord::default()
            })
            .collect();
        build_task_tree(&records).unwrap()
    }

    #[test]
    fn test_preorder_visits_depth_first() {
        let t = tree(&["+r", "+r+a", "+r+b", "+r+a+x"]);
        let keys: Vec<&str> = PreOrder::new(&t, vec![NodeId::ROOT], |_| true)
            .map(|n| n.key())
            .collect();
        assert_eq!(keys, vec!["", "+r", "+r+a", "+r+a+x", "+r+b"]);
    }

    #[test]
    fn test_preorder_respects_descend() {
        let t = tree(&["+r", "+r+a", "+r+a+x", "+r+b"]);
        let keys: Vec<&str> = PreOrder::new(&t, vec![NodeId::ROOT], |n| n.key() != "+r+a")
            .map(|n| n.key())
            .collect();
        assert_eq!(keys, vec!["", "+r", "+r+a", "+r+b"]);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(185), "3m 5s");
        assert_eq!(format_duration(7800), "2h 10m");
    }
}
