use crate::model::{
    Attempt, AttemptStatus, AttemptSummary, ProjectRef, Session, TaskRecord, TaskState, Workflow,
    WorkflowRef,
};
use crate::parser::{save_attempt, save_sessions, save_workflows};
use std::path::Path;

/// Create a task record with the given full name and state; the id is its name.
pub fn make_record(full_name: &str, state: TaskState) -> TaskRecord {
    TaskRecord {
        id: full_name.to_string(),
        full_name: full_name.to_string(),
        state,
        ..TaskRecord::default()
    }
}

/// Successful task records for the given names, in order.
pub fn records_from_names(names: &[&str]) -> Vec<TaskRecord> {
    names
        .iter()
        .map(|n| make_record(n, TaskState::Success))
        .collect()
}

/// The `basic` workflow's task list: a root task with sequential, nested
/// and parallel children.
pub fn basic_workflow_records() -> Vec<TaskRecord> {
    records_from_names(&[
        "+basic",
        "+basic+my_task_1",
        "+basic+my_task_2",
        "+basic+any_task_name_here",
        "+basic+any_task_name_here+nested_task",
        "+basic+any_task_name_here+nested_task_2",
        "+basic+parallel_task_foo",
        "+basic+parallel_task_foo+bar",
        "+basic+parallel_task_foo+baz",
        "+basic+abc",
    ])
}

pub fn example_project() -> ProjectRef {
    ProjectRef {
        id: "1".to_string(),
        name: "example".to_string(),
    }
}

/// A finished attempt of `example/basic` holding `tasks`.
pub fn make_attempt(id: &str, tasks: Vec<TaskRecord>) -> Attempt {
    Attempt {
        id: id.to_string(),
        index: 1,
        project: example_project(),
        workflow: WorkflowRef {
            id: "5".to_string(),
            name: "basic".to_string(),
        },
        session_id: id.to_string(),
        session_uuid: format!("uuid-{}", id),
        done: true,
        success: true,
        tasks,
        ..Attempt::default()
    }
}

/// A session of `example/<workflow>` whose latest attempt has `status`.
pub fn make_session(id: &str, workflow: &str, status: AttemptStatus) -> Session {
    let (done, success, cancel_requested) = match status {
        AttemptStatus::Success => (true, true, false),
        AttemptStatus::Failure => (true, false, false),
        AttemptStatus::Canceled => (true, false, true),
        AttemptStatus::Canceling => (false, false, true),
        AttemptStatus::Running | AttemptStatus::Pending => (false, false, false),
    };
    let last_attempt = (status != AttemptStatus::Pending).then(|| AttemptSummary {
        id: id.to_string(),
        done,
        success,
        cancel_requested,
        ..AttemptSummary::default()
    });
    Session {
        id: id.to_string(),
        project: example_project(),
        workflow: WorkflowRef {
            id: format!("wf-{}", workflow),
            name: workflow.to_string(),
        },
        session_uuid: format!("uuid-{}", id),
        session_time: None,
        last_attempt,
    }
}

pub fn make_workflow(id: &str, name: &str) -> Workflow {
    Workflow {
        id: id.to_string(),
        name: name.to_string(),
        project: example_project(),
        ..Workflow::default()
    }
}

/// Populate a data directory with the given snapshot documents.
pub fn setup_snapshot(
    dir: &Path,
    attempts: &[Attempt],
    sessions: Vec<Session>,
    workflows: Vec<Workflow>,
) {
    std::fs::create_dir_all(dir).unwrap();
    for attempt in attempts {
        save_attempt(dir, attempt).unwrap();
    }
    save_sessions(dir, sessions).unwrap();
    save_workflows(dir, workflows).unwrap();
}
