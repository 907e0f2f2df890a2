//! Session list items and the status filter applied to them.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::model::{AttemptStatus, Session};

/// One row of the sessions list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionListItem {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    pub workflow_id: String,
    pub workflow_name: String,
    pub session_uuid: String,
    pub last_attempt_id: Option<String>,
    pub status: AttemptStatus,
}

impl From<&Session> for SessionListItem {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            project_id: session.project.id.clone(),
            project_name: session.project.name.clone(),
            workflow_id: session.workflow.id.clone(),
            workflow_name: session.workflow.name.clone(),
            session_uuid: session.session_uuid.clone(),
            last_attempt_id: session.last_attempt_id().map(str::to_string),
            status: session.status(),
        }
    }
}

impl Session {
    pub fn to_list_item(&self) -> SessionListItem {
        SessionListItem::from(self)
    }
}

/// The selected value of the sessions status filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Status(AttemptStatus),
    /// A value outside the known set; matches nothing
    Unrecognized(String),
}

impl StatusFilter {
    /// Selectable values, in the order the filter control lists them
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(StatusFilter::All)
            .chain(AttemptStatus::ALL.iter().copied().map(StatusFilter::Status))
            .collect()
    }

    pub fn matches(&self, status: AttemptStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(selected) => *selected == status,
            StatusFilter::Unrecognized(_) => false,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Status(status) => status.label(),
            StatusFilter::Unrecognized(value) => value,
        }
    }

    /// The option after this one, wrapping around; unrecognized values go to `All`
    pub fn next(&self) -> StatusFilter {
        let options = Self::options();
        match options.iter().position(|o| o == self) {
            Some(i) => options[(i + 1) % options.len()].clone(),
            None => StatusFilter::All,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("all") || value.is_empty() {
            return Ok(StatusFilter::All);
        }
        Ok(AttemptStatus::ALL
            .iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .map_or_else(
                || StatusFilter::Unrecognized(value.to_string()),
                |status| StatusFilter::Status(*status),
            ))
    }
}

impl From<&str> for StatusFilter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sessions whose status matches `filter`, in their original order
pub fn filter_sessions_by_status<'a>(
    sessions: &'a [SessionListItem],
    filter: &StatusFilter,
) -> Vec<&'a SessionListItem> {
    sessions.iter().filter(|s| filter.matches(s.status)).collect()
}
