use anyhow::Result;
use std::path::Path;
use wfconsole::collapse::CollapseState;
use wfconsole::config::Config;
use wfconsole::tree::TaskTree;
use wfconsole::view::{render_timeline, timeline_rows};

use super::load_attempt_tree;

/// Collapse store for a one-shot render, with `collapse` keys applied
pub fn collapse_state_for(tree: &TaskTree, attempt_id: &str, collapse: &[String]) -> CollapseState {
    let mut store = CollapseState::new();
    store.rebind(attempt_id);
    for key in collapse {
        if !tree.contains(key) {
            tracing::warn!(key = %key, "collapse key does not name a task in this attempt");
        }
        store.collapse(key);
    }
    store
}

pub fn run(dir: &Path, attempt_id: &str, collapse: &[String], json: bool) -> Result<()> {
    let (_attempt, tree) = load_attempt_tree(dir, attempt_id)?;
    let config = Config::load(dir)?;
    let store = collapse_state_for(&tree, attempt_id, collapse);

    if json {
        let rows = timeline_rows(&tree, &store);
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let lines = render_timeline(&tree, &store, &config.display);
    if lines.is_empty() {
        println!("No tasks below the root task");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfconsole::test_helpers::basic_workflow_records;
    use wfconsole::tree::build_task_tree;
    use wfconsole::view::visible_timeline_nodes;

    #[test]
    fn collapse_keys_hide_descendants() {
        let tree = build_task_tree(&basic_workflow_records()).unwrap();
        let store = collapse_state_for(
            &tree,
            "1",
            &["+basic+parallel_task_foo".to_string()],
        );
        let labels: Vec<String> = visible_timeline_nodes(&tree, &store)
            .map(|n| n.label())
            .collect();
        assert!(labels.contains(&"+parallel_task_foo".to_string()));
        assert!(!labels.contains(&"+bar".to_string()));
        assert!(!labels.contains(&"+baz".to_string()));
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn unknown_collapse_key_is_harmless() {
        let tree = build_task_tree(&basic_workflow_records()).unwrap();
        let store = collapse_state_for(&tree, "1", &["+nope".to_string()]);
        assert_eq!(visible_timeline_nodes(&tree, &store).count(), 9);
    }
}
