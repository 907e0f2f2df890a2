//! Task tree construction.
//!
//! An attempt's tasks arrive as a flat, ordered list of records. The tree is
//! an arena of nodes keyed by full name, with a synthetic container at key
//! `""`. Intermediate nodes implied by a name but absent from the list are
//! created as placeholders and filled in if their record shows up later.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{TaskRecord, TaskState};
use crate::task_name::{segment_label, TaskName, TaskNameError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("malformed task name at position {order}: {source}")]
    MalformedTaskName {
        order: usize,
        #[source]
        source: TaskNameError,
    },
    #[error("duplicate task path '{path}' at positions {first} and {second}")]
    DuplicateTaskPath {
        path: String,
        first: usize,
        second: usize,
    },
}

/// A record whose `parentId` names a different task than the one its full
/// name places it under. Edges always follow the name; this is only reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentIdMismatch {
    pub order: usize,
    pub full_name: String,
    pub declared: String,
    /// Id of the name-implied parent; `None` for a top-level task
    pub implied: Option<String>,
}

impl fmt::Display for ParentIdMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task '{}' declares parent id {} but its name places it under ",
            self.full_name, self.declared
        )?;
        match self.implied {
            Some(ref id) => write!(f, "task id {}", id),
            None => f.write_str("no parent"),
        }
    }
}

impl TreeError {
    /// Whether the error comes from a name that cannot be placed in the tree
    pub fn is_malformed(&self) -> bool {
        matches!(self, TreeError::MalformedTaskName { .. })
    }
}

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    id: NodeId,
    key: String,
    segment: String,
    depth: usize,
    parent: Option<NodeId>,
    /// Position of the record in the input list, if one was supplied
    order: Option<usize>,
    record: Option<TaskRecord>,
    children: Vec<NodeId>,
}

impl TaskNode {
    fn new(id: NodeId, key: String, segment: String, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            id,
            key,
            segment,
            depth,
            parent,
            order: None,
            record: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Full name of the node; `""` for the synthetic root
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Own segment with its `+` prefix, as the timeline shows it
    pub fn label(&self) -> String {
        segment_label(&self.segment)
    }

    /// Number of segments in the key (synthetic root = 0, root task = 1)
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn order(&self) -> Option<usize> {
        self.order
    }

    pub fn record(&self) -> Option<&TaskRecord> {
        self.record.as_ref()
    }

    pub fn state(&self) -> Option<TaskState> {
        self.record.as_ref().map(|r| r.state)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_synthetic_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// A non-root node that no record ever supplied
    pub fn is_placeholder(&self) -> bool {
        !self.is_synthetic_root() && self.record.is_none()
    }
}

/// The task tree of one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTree {
    nodes: Vec<TaskNode>,
    index: HashMap<String, NodeId>,
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTree {
    /// A tree holding only the synthetic root
    pub fn new() -> Self {
        let root = TaskNode::new(NodeId::ROOT, String::new(), String::new(), 0, None);
        let mut index = HashMap::new();
        index.insert(String::new(), NodeId::ROOT);
        Self {
            nodes: vec![root],
            index,
        }
    }

    pub fn root(&self) -> &TaskNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// The node behind `id`; `None` for an id from a different tree
    pub fn node(&self, id: NodeId) -> Option<&TaskNode> {
        self.nodes.get(id.0)
    }

    // Ids stored in this tree's own index and child lists are always in range
    fn at(&self, id: NodeId) -> &TaskNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, key: &str) -> Option<&TaskNode> {
        self.index.get(key).map(|&id| self.at(id))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of task nodes, placeholders included, synthetic root excluded
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn children<'a>(&'a self, node: &'a TaskNode) -> impl Iterator<Item = &'a TaskNode> + 'a {
        node.children.iter().map(move |&id| self.at(id))
    }

    pub fn parent(&self, node: &TaskNode) -> Option<&TaskNode> {
        node.parent.map(|id| self.at(id))
    }

    /// Top-level tasks (normally exactly one: the attempt's root task)
    pub fn root_tasks(&self) -> impl Iterator<Item = &TaskNode> {
        self.children(self.root())
    }

    /// Recordless non-root nodes, in creation order
    pub fn placeholders(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.iter().filter(|n| n.is_placeholder())
    }

    /// Every node other than the synthetic root, in creation order
    pub fn iter(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.iter().skip(1)
    }

    fn insert_child(&mut self, parent: NodeId, segment: &str, key: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.index.insert(key.clone(), id);
        self.nodes
            .push(TaskNode::new(id, key, segment.to_string(), depth, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Walk the name's prefixes from shallow to deep, creating missing nodes
    fn ensure_path(&mut self, name: &TaskName) -> NodeId {
        let mut current = NodeId::ROOT;
        for (segment, key) in name.segments().iter().zip(name.prefix_keys()) {
            current = match self.index.get(&key).copied() {
                Some(id) => id,
                None => self.insert_child(current, segment, key),
            };
        }
        current
    }

    /// Records whose `parent_id` disagrees with the record owning their
    /// name-implied parent. Records under a placeholder are not checked.
    pub fn parent_id_mismatches(&self) -> Vec<ParentIdMismatch> {
        let mut mismatches = Vec::new();
        for node in self.iter() {
            let (Some(record), Some(order)) = (node.record(), node.order) else {
                continue;
            };
            let Some(declared) = record.parent_id.as_deref() else {
                continue;
            };
            let implied = match self.parent(node) {
                Some(p) if p.is_synthetic_root() => None,
                Some(p) => match p.record() {
                    Some(r) => Some(r.id.as_str()),
                    None => continue,
                },
                None => None,
            };
            if implied != Some(declared) {
                mismatches.push(ParentIdMismatch {
                    order,
                    full_name: record.full_name.clone(),
                    declared: declared.to_string(),
                    implied: implied.map(str::to_string),
                });
            }
        }
        mismatches.sort_by_key(|m| m.order);
        mismatches
    }
}

/// Build the task tree for an ordered list of task records.
///
/// Siblings keep the order in which their path was first seen. Edges come
/// from the names alone; `parentId` is not consulted. The whole build fails
/// on the first malformed name or duplicate path; no partial tree is returned.
pub fn build_task_tree(records: &[TaskRecord]) -> Result<TaskTree, TreeError> {
    let mut tree = TaskTree::new();

    for (order, record) in records.iter().enumerate() {
        let name = TaskName::parse(&record.full_name)
            .map_err(|source| TreeError::MalformedTaskName { order, source })?;
        let id = tree.ensure_path(&name);
        let node = &mut tree.nodes[id.0];
        if let Some(first) = node.order {
            return Err(TreeError::DuplicateTaskPath {
                path: name.key().to_string(),
                first,
                second: order,
            });
        }
        node.order = Some(order);
        node.record = Some(record.clone());
    }

    for node in tree.placeholders() {
        warn!(path = node.key(), "task has no record; rendering as placeholder");
    }
    debug!(
        records = records.len(),
        nodes = tree.len(),
        "built task tree"
    );

    Ok(tree)
}
