pub mod collapse;
pub mod config;
pub mod model;
pub mod parser;
pub mod sessions;
pub mod task_name;
pub mod tree;
pub mod view;
#[cfg(any(test, feature = "test-support"))]
pub mod test_helpers;

pub use collapse::{CollapseState, toggle};
pub use config::{Config, DisplayConfig, SessionsConfig, TuiConfig};
pub use model::{Attempt, AttemptStatus, Session, TaskRecord, TaskState, Workflow};
pub use parser::{ParseError, load_attempt, load_sessions, load_workflows};
pub use sessions::{SessionListItem, StatusFilter, filter_sessions_by_status};
pub use task_name::{TaskName, TaskNameError};
pub use tree::{NodeId, ParentIdMismatch, TaskNode, TaskTree, TreeError, build_task_tree};
pub use view::{all_task_nodes, visible_timeline_nodes};
