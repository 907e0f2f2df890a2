use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a project as embedded in sessions, attempts and workflows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// Reference to a workflow as embedded in sessions and attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkflowRef {
    pub id: String,
    pub name: String,
}

/// Task state as reported by the workflow server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    Blocked,
    Ready,
    RetryWaiting,
    GroupRetryWaiting,
    Planned,
    Running,
    Success,
    GroupError,
    Canceled,
    Error,
}

impl TaskState {
    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Blocked => "Blocked",
            TaskState::Ready => "Ready",
            TaskState::RetryWaiting => "Retry Waiting",
            TaskState::GroupRetryWaiting => "Group Retry Waiting",
            TaskState::Planned => "Planned",
            TaskState::Running => "Running",
            TaskState::Success => "Success",
            TaskState::GroupError => "Group Error",
            TaskState::Canceled => "Canceled",
            TaskState::Error => "Error",
        }
    }

    /// Terminal states: the task will not run again within this attempt
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            TaskState::Success | TaskState::GroupError | TaskState::Canceled | TaskState::Error
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TaskState::GroupError | TaskState::Error)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One task of an attempt, exactly as received from the server.
///
/// `full_name` is the breadcrumb (`+root+child+grandchild`) that places the
/// task in the attempt's tree. The position of a record in its list is its
/// order; the tree builder keeps that position as the node's record index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upstreams: Vec<String>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub cancel_requested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_at: Option<DateTime<Utc>>,
}

/// Status of an attempt, and of a session through its latest attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptStatus {
    Success,
    Failure,
    Running,
    Canceling,
    Canceled,
    /// A session whose first attempt has not been created yet
    Pending,
}

impl AttemptStatus {
    pub const ALL: [AttemptStatus; 6] = [
        AttemptStatus::Success,
        AttemptStatus::Failure,
        AttemptStatus::Running,
        AttemptStatus::Canceling,
        AttemptStatus::Canceled,
        AttemptStatus::Pending,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AttemptStatus::Success => "Success",
            AttemptStatus::Failure => "Failure",
            AttemptStatus::Running => "Running",
            AttemptStatus::Canceling => "Canceling",
            AttemptStatus::Canceled => "Canceled",
            AttemptStatus::Pending => "Pending",
        }
    }

    /// Derive the status from the done/success/cancel flags the server reports
    pub fn from_flags(done: bool, success: bool, cancel_requested: bool) -> Self {
        match (done, success, cancel_requested) {
            (true, true, _) => AttemptStatus::Success,
            (true, false, true) => AttemptStatus::Canceled,
            (true, false, false) => AttemptStatus::Failure,
            (false, _, true) => AttemptStatus::Canceling,
            (false, _, false) => AttemptStatus::Running,
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One concrete execution of a workflow, with its ordered task list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    #[serde(default)]
    pub index: u32,
    pub project: ProjectRef,
    pub workflow: WorkflowRef,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub session_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempt_name: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cancel_requested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

impl Attempt {
    pub fn status(&self) -> AttemptStatus {
        AttemptStatus::from_flags(self.done, self.success, self.cancel_requested)
    }
}

/// The attempt summary a session carries for its latest attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempt_name: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cancel_requested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl AttemptSummary {
    pub fn status(&self) -> AttemptStatus {
        AttemptStatus::from_flags(self.done, self.success, self.cancel_requested)
    }
}

/// A logical scheduling of a workflow, pointing at its latest attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub project: ProjectRef,
    pub workflow: WorkflowRef,
    pub session_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt: Option<AttemptSummary>,
}

impl Session {
    pub fn status(&self) -> AttemptStatus {
        self.last_attempt
            .as_ref()
            .map_or(AttemptStatus::Pending, AttemptSummary::status)
    }

    pub fn last_attempt_id(&self) -> Option<&str> {
        self.last_attempt.as_ref().map(|a| a.id.as_str())
    }
}

/// A workflow definition within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub project: ProjectRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Group workflows by project id, keeping first-seen project order and
/// the original order of workflows within each project
pub fn workflows_by_project(workflows: &[Workflow]) -> Vec<(&ProjectRef, Vec<&Workflow>)> {
    let mut groups: Vec<(&ProjectRef, Vec<&Workflow>)> = Vec::new();
    for wf in workflows {
        match groups.iter_mut().find(|(p, _)| p.id == wf.project.id) {
            Some((_, list)) => list.push(wf),
            None => groups.push((&wf.project, vec![wf])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_status_from_flags() {
        assert_eq!(AttemptStatus::from_flags(true, true, false), AttemptStatus::Success);
        assert_eq!(AttemptStatus::from_flags(true, true, true), AttemptStatus::Success);
        assert_eq!(AttemptStatus::from_flags(true, false, false), AttemptStatus::Failure);
        assert_eq!(AttemptStatus::from_flags(true, false, true), AttemptStatus::Canceled);
        assert_eq!(AttemptStatus::from_flags(false, false, true), AttemptStatus::Canceling);
        assert_eq!(AttemptStatus::from_flags(false, false, false), AttemptStatus::Running);
    }

    #[test]
    fn test_session_without_attempt_is_pending() {
        let session = Session {
            id: "1".to_string(),
            session_uuid: "u".to_string(),
            ..Session::default()
        };
        assert_eq!(session.status(), AttemptStatus::Pending);
        assert!(session.last_attempt_id().is_none());
    }

    #[test]
    fn test_task_record_deserializes_camel_case() {
        let json = r#"{
            "id": "7",
            "fullName": "+basic+my_task_1",
            "parentId": "2",
            "state": "group_error",
            "upstreams": ["6"],
            "isGroup": true,
            "cancelRequested": false,
            "startedAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:01:00Z",
            "retryAt": null
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.full_name, "+basic+my_task_1");
        assert_eq!(record.parent_id.as_deref(), Some("2"));
        assert_eq!(record.state, TaskState::GroupError);
        assert!(record.is_group);
        assert!(record.retry_at.is_none());
        assert!(record.state.is_done());
        assert!(record.state.is_error());
    }

    #[test]
    fn test_task_state_labels() {
        assert_eq!(TaskState::RetryWaiting.to_string(), "Retry Waiting");
        assert_eq!(TaskState::Success.label(), "Success");
        assert!(!TaskState::Running.is_done());
    }

    #[test]
    fn test_workflows_by_project_preserves_order() {
        let wf = |id: &str, name: &str, project: &str| Workflow {
            id: id.to_string(),
            name: name.to_string(),
            project: ProjectRef {
                id: project.to_string(),
                name: format!("project-{}", project),
            },
            ..Workflow::default()
        };
        let workflows = vec![
            wf("1", "error_task", "1"),
            wf("2", "other", "2"),
            wf("3", "generate_subtasks", "1"),
        ];
        let groups = workflows_by_project(&workflows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.id, "1");
        let names: Vec<&str> = groups[0].1.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["error_task", "generate_subtasks"]);
        assert_eq!(groups[1].1.len(), 1);
    }
}
