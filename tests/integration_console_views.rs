//! Integration tests for the timeline and tasks views and the session filter.
//!
//! The `basic` workflow used throughout has a root task with sequential,
//! nested and parallel children, the same shape the console shows for the
//! bundled example project.

use wfconsole::collapse::{CollapseState, toggle};
use wfconsole::model::{AttemptStatus, TaskState};
use wfconsole::sessions::{SessionListItem, StatusFilter, filter_sessions_by_status};
use wfconsole::test_helpers::{basic_workflow_records, make_session, records_from_names};
use wfconsole::tree::{TaskTree, TreeError, build_task_tree};
use wfconsole::view::{all_task_nodes, task_rows, timeline_rows, visible_timeline_nodes};

fn basic_tree() -> TaskTree {
    build_task_tree(&basic_workflow_records()).unwrap()
}

fn timeline_labels(tree: &TaskTree, store: &CollapseState) -> Vec<String> {
    visible_timeline_nodes(tree, store).map(|n| n.label()).collect()
}

fn timeline_keys(tree: &TaskTree, store: &CollapseState) -> Vec<String> {
    visible_timeline_nodes(tree, store)
        .map(|n| n.key().to_string())
        .collect()
}

// ===========================================================================
// Timeline of the basic workflow
// ===========================================================================

#[test]
fn test_timeline_shows_root_task_children_with_own_segment_labels() {
    let tree = basic_tree();
    let store = CollapseState::new();

    let labels = timeline_labels(&tree, &store);
    assert_eq!(
        labels,
        vec![
            "+my_task_1",
            "+my_task_2",
            "+any_task_name_here",
            "+nested_task",
            "+nested_task_2",
            "+parallel_task_foo",
            "+bar",
            "+baz",
            "+abc",
        ]
    );
    assert!(!labels.contains(&"+basic".to_string()));
}

#[test]
fn test_timeline_depths_follow_nesting() {
    let tree = basic_tree();
    let rows = timeline_rows(&tree, &CollapseState::new());
    let depths: Vec<(String, usize)> = rows.iter().map(|r| (r.label.clone(), r.depth)).collect();
    assert_eq!(depths[0], ("+my_task_1".to_string(), 0));
    assert_eq!(depths[3], ("+nested_task".to_string(), 1));
    assert_eq!(depths[6], ("+bar".to_string(), 1));
    assert_eq!(depths[8], ("+abc".to_string(), 0));
}

#[test]
fn test_tasks_view_lists_every_task_with_full_names() {
    let tree = basic_tree();
    let keys: Vec<String> = all_task_nodes(&tree).map(|n| n.key().to_string()).collect();
    let expected: Vec<String> = basic_workflow_records()
        .into_iter()
        .map(|r| r.full_name)
        .collect();
    assert_eq!(keys, expected);

    let rows = task_rows(&tree);
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].label, "+basic");
    assert_eq!(rows[0].parent_key, None);
    assert_eq!(rows[4].label, "+basic+any_task_name_here+nested_task");
    assert_eq!(rows[4].parent_key.as_deref(), Some("+basic+any_task_name_here"));
}

#[test]
fn test_tasks_view_ignores_collapse_state() {
    let tree = basic_tree();
    let mut store = CollapseState::new();
    store.collapse("+basic+any_task_name_here");
    store.collapse("+basic+parallel_task_foo");
    assert_eq!(timeline_labels(&tree, &store).len(), 5);
    assert_eq!(all_task_nodes(&tree).count(), 10);
}

// ===========================================================================
// Collapsing and expanding
// ===========================================================================

#[test]
fn test_collapse_hides_subtree_and_expand_restores_it() {
    let tree = basic_tree();
    let mut store = CollapseState::new();

    toggle(&mut store, "+basic+any_task_name_here");
    let labels = timeline_labels(&tree, &store);
    assert!(labels.contains(&"+any_task_name_here".to_string()));
    assert!(!labels.contains(&"+nested_task".to_string()));
    assert!(!labels.contains(&"+nested_task_2".to_string()));
    assert!(labels.contains(&"+bar".to_string()));
    assert_eq!(labels.len(), 7);

    toggle(&mut store, "+basic+any_task_name_here");
    assert_eq!(timeline_labels(&tree, &store).len(), 9);
}

#[test]
fn test_toggle_twice_restores_every_sequence() {
    let tree = basic_tree();
    let baseline = timeline_keys(&tree, &CollapseState::new());

    for node in all_task_nodes(&tree) {
        let mut store = CollapseState::new();
        toggle(&mut store, node.key());
        toggle(&mut store, node.key());
        assert_eq!(timeline_keys(&tree, &store), baseline, "toggling {}", node.key());
    }
}

#[test]
fn test_collapse_only_affects_descendants() {
    let tree = basic_tree();
    let baseline = timeline_keys(&tree, &CollapseState::new());

    for node in all_task_nodes(&tree).filter(|n| n.depth() > 1) {
        let mut store = CollapseState::new();
        store.collapse(node.key());
        let visible = timeline_keys(&tree, &store);
        let descendant_prefix = format!("{}+", node.key());
        let expected: Vec<String> = baseline
            .iter()
            .filter(|k| !k.starts_with(&descendant_prefix))
            .cloned()
            .collect();
        assert_eq!(visible, expected, "collapsing {}", node.key());
    }
}

#[test]
fn test_collapsing_root_task_does_not_hide_timeline() {
    let tree = basic_tree();
    let mut store = CollapseState::new();
    store.collapse("+basic");
    assert_eq!(timeline_labels(&tree, &store).len(), 9);
}

#[test]
fn test_collapse_state_survives_rebuild_of_same_attempt() {
    let mut store = CollapseState::new();
    store.rebind("1");
    store.collapse("+basic+parallel_task_foo");

    let rebuilt = basic_tree();
    assert!(!store.rebind("1"));
    assert_eq!(timeline_labels(&rebuilt, &store).len(), 7);

    assert!(store.rebind("2"));
    assert_eq!(timeline_labels(&rebuilt, &store).len(), 9);
}

// ===========================================================================
// Path invariants over arbitrary task lists
// ===========================================================================

#[test]
fn test_every_node_key_extends_its_parent_key() {
    let tree = build_task_tree(&records_from_names(&[
        "+wf",
        "+wf+a",
        "+wf+a+b+c",
        "+wf+d",
        "+wf+a+e",
        "+other+x",
    ]))
    .unwrap();

    for node in all_task_nodes(&tree) {
        let parent = tree.parent(node).unwrap();
        if parent.is_synthetic_root() {
            assert_eq!(node.depth(), 1);
        } else {
            assert_eq!(node.key(), format!("{}+{}", parent.key(), node.segment()));
            assert_eq!(node.depth(), parent.depth() + 1);
        }
    }
    assert!(tree.get("+wf+a+b").unwrap().is_placeholder());
    assert!(tree.get("+other").unwrap().is_placeholder());
}

#[test]
fn test_siblings_keep_first_seen_order() {
    let tree = build_task_tree(&records_from_names(&[
        "+wf",
        "+wf+z",
        "+wf+a",
        "+wf+m",
        "+wf+a+2",
        "+wf+a+1",
    ]))
    .unwrap();
    let labels = timeline_labels(&tree, &CollapseState::new());
    assert_eq!(labels, vec!["+z", "+a", "+2", "+1", "+m"]);
}

#[test]
fn test_placeholder_nodes_have_no_state() {
    let tree = build_task_tree(&records_from_names(&["+wf", "+wf+a+b"])).unwrap();
    let rows = timeline_rows(&tree, &CollapseState::new());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "+a");
    assert_eq!(rows[0].state, None);
    assert_eq!(rows[0].state_label(), "-");
    assert_eq!(rows[1].state, Some(TaskState::Success));
}

#[test]
fn test_invalid_task_lists_are_rejected() {
    let err = build_task_tree(&records_from_names(&["+wf", "wf+a"])).unwrap_err();
    assert!(matches!(err, TreeError::MalformedTaskName { order: 1, .. }));
    assert!(err.is_malformed());

    let err = build_task_tree(&records_from_names(&["+wf", "+wf+a", "+wf+a"])).unwrap_err();
    match err {
        TreeError::DuplicateTaskPath { path, first, second } => {
            assert_eq!(path, "+wf+a");
            assert_eq!((first, second), (1, 2));
        }
        other => panic!("expected duplicate path, got {:?}", other),
    }
}

// ===========================================================================
// Sessions status filter
// ===========================================================================

fn scenario_sessions() -> Vec<SessionListItem> {
    vec![
        make_session("1", "basic", AttemptStatus::Success),
        make_session("2", "generate_subtasks", AttemptStatus::Failure),
        make_session("3", "basic", AttemptStatus::Success),
        make_session("4", "error_task", AttemptStatus::Failure),
        make_session("5", "sla", AttemptStatus::Running),
    ]
    .iter()
    .map(SessionListItem::from)
    .collect()
}

#[test]
fn test_failure_filter_keeps_only_failures_in_order() {
    let sessions = scenario_sessions();
    let filter = StatusFilter::from("Failure");
    let shown = filter_sessions_by_status(&sessions, &filter);
    let ids: Vec<&str> = shown.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);
}

#[test]
fn test_switching_filter_back_and_forth() {
    let sessions = scenario_sessions();
    let success = filter_sessions_by_status(&sessions, &StatusFilter::from("Success"));
    assert_eq!(success.len(), 2);
    assert!(success.iter().all(|s| s.status == AttemptStatus::Success));

    let all = filter_sessions_by_status(&sessions, &StatusFilter::All);
    assert_eq!(all.len(), sessions.len());
}

#[test]
fn test_every_filter_result_is_an_ordered_subsequence() {
    let sessions = scenario_sessions();
    for filter in StatusFilter::options() {
        let shown = filter_sessions_by_status(&sessions, &filter);
        let positions: Vec<usize> = shown
            .iter()
            .map(|s| sessions.iter().position(|o| o.id == s.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "filter {}", filter);
        assert!(shown.iter().all(|s| filter.matches(s.status)));
    }
}
