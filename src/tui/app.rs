use std::path::PathBuf;
use std::time::Duration;

use wfconsole::collapse::CollapseState;
use wfconsole::config::Config;
use wfconsole::model::Attempt;
use wfconsole::parser::{load_attempt, load_sessions};
use wfconsole::sessions::{SessionListItem, StatusFilter, filter_sessions_by_status};
use wfconsole::tree::{TaskTree, build_task_tree};
use wfconsole::view::{TaskRow, TimelineRow, task_rows, timeline_rows};

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Timeline,
    Tasks,
    Sessions,
}

impl Panel {
    fn next(self) -> Self {
        match self {
            Panel::Timeline => Panel::Tasks,
            Panel::Tasks => Panel::Sessions,
            Panel::Sessions => Panel::Timeline,
        }
    }
}

pub struct App {
    pub data_dir: PathBuf,
    pub config: Config,
    pub poll_interval: Duration,
    pub attempt: Option<Attempt>,
    pub tree: TaskTree,
    /// Error from loading the attempt or building its tree
    pub load_error: Option<String>,
    /// Timeline expand/collapse state, reset whenever the attempt changes
    pub collapse: CollapseState,
    pub timeline: Vec<TimelineRow>,
    pub tasks: Vec<TaskRow>,
    pub sessions: Vec<SessionListItem>,
    pub status_filter: StatusFilter,
    pub panel: Panel,
    pub timeline_selected: usize,
    pub tasks_selected: usize,
    pub sessions_selected: usize,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(data_dir: PathBuf, attempt_id: &str, config: Config) -> Self {
        let poll_interval = Duration::from_millis(config.tui.tick_ms);
        let status_filter = config.sessions.default_filter();
        let mut app = Self {
            data_dir,
            config,
            poll_interval,
            attempt: None,
            tree: TaskTree::new(),
            load_error: None,
            collapse: CollapseState::new(),
            timeline: Vec::new(),
            tasks: Vec::new(),
            sessions: Vec::new(),
            status_filter,
            panel: Panel::Timeline,
            timeline_selected: 0,
            tasks_selected: 0,
            sessions_selected: 0,
            show_help: false,
            should_quit: false,
        };
        app.load_sessions();
        app.open_attempt(attempt_id);
        app
    }

    fn load_sessions(&mut self) {
        match load_sessions(&self.data_dir) {
            Ok(sessions) => {
                self.sessions = sessions.iter().map(SessionListItem::from).collect();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load sessions");
                self.sessions.clear();
            }
        }
        self.clamp_selection();
    }

    /// Load an attempt from the data directory and show it
    pub fn open_attempt(&mut self, attempt_id: &str) {
        match load_attempt(&self.data_dir, attempt_id) {
            Ok(attempt) => self.set_attempt(attempt),
            Err(e) => {
                self.attempt = None;
                self.tree = TaskTree::new();
                self.load_error = Some(e.to_string());
                self.collapse.rebind(attempt_id);
                self.rebuild_rows();
            }
        }
    }

    /// Show an already-loaded attempt. Collapse state survives only if the
    /// attempt is the one already shown.
    pub fn set_attempt(&mut self, attempt: Attempt) {
        if self.collapse.rebind(&attempt.id) {
            self.timeline_selected = 0;
        }
        match build_task_tree(&attempt.tasks) {
            Ok(tree) => {
                self.tree = tree;
                self.load_error = None;
            }
            Err(e) => {
                self.tree = TaskTree::new();
                self.load_error = Some(e.to_string());
            }
        }
        self.attempt = Some(attempt);
        self.rebuild_rows();
    }

    /// Recompute both projections from the tree and collapse state
    pub fn rebuild_rows(&mut self) {
        self.timeline = timeline_rows(&self.tree, &self.collapse);
        self.tasks = task_rows(&self.tree);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.timeline_selected = clamp(self.timeline_selected, self.timeline.len());
        self.tasks_selected = clamp(self.tasks_selected, self.tasks.len());
        self.sessions_selected = clamp(self.sessions_selected, self.visible_sessions().len());
    }

    pub fn reload(&mut self) {
        self.load_sessions();
        if let Some(id) = self.attempt.as_ref().map(|a| a.id.clone()) {
            self.open_attempt(&id);
        }
    }

    pub fn visible_sessions(&self) -> Vec<&SessionListItem> {
        filter_sessions_by_status(&self.sessions, &self.status_filter)
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.next();
        self.sessions_selected = 0;
    }

    /// Toggle the selected timeline node and keep the selection on it.
    /// A leaf keeps its toggled state and shows it once it gains children.
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.timeline.get(self.timeline_selected) else {
            return;
        };
        let key = row.key.clone();
        self.collapse.toggle(&key);
        self.rebuild_rows();
        if let Some(pos) = self.timeline.iter().position(|r| r.key == key) {
            self.timeline_selected = pos;
        }
    }

    /// Open the latest attempt of the selected session
    pub fn open_selected_session(&mut self) {
        let attempt_id = self
            .visible_sessions()
            .get(self.sessions_selected)
            .and_then(|s| s.last_attempt_id.clone());
        if let Some(id) = attempt_id {
            self.open_attempt(&id);
            self.panel = Panel::Timeline;
        }
    }

    pub fn activate(&mut self) {
        match self.panel {
            Panel::Timeline => self.toggle_selected(),
            Panel::Sessions => self.open_selected_session(),
            Panel::Tasks => {}
        }
    }

    pub fn next_panel(&mut self) {
        self.panel = self.panel.next();
    }

    pub fn scroll_up(&mut self) {
        let selected = self.selected_mut();
        *selected = selected.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let len = match self.panel {
            Panel::Timeline => self.timeline.len(),
            Panel::Tasks => self.tasks.len(),
            Panel::Sessions => self.visible_sessions().len(),
        };
        let selected = self.selected_mut();
        if len > 0 {
            *selected = (*selected + 1).min(len - 1);
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.panel {
            Panel::Timeline => &mut self.timeline_selected,
            Panel::Tasks => &mut self.tasks_selected,
            Panel::Sessions => &mut self.sessions_selected,
        }
    }

    pub fn title(&self) -> String {
        match self.attempt {
            Some(ref a) => format!(
                " {} / {} - attempt {} [{}] ",
                a.project.name,
                a.workflow.name,
                a.id,
                a.status()
            ),
            None => " no attempt loaded ".to_string(),
        }
    }

    pub fn key_hints(&self) -> &'static str {
        match self.panel {
            Panel::Timeline => " q=quit ?=help Tab=panel j/k=move Enter=fold s=status r=reload ",
            Panel::Tasks => " q=quit ?=help Tab=panel j/k=move s=status r=reload ",
            Panel::Sessions => " q=quit ?=help Tab=panel j/k=move Enter=open s=status r=reload ",
        }
    }
}

fn clamp(selected: usize, len: usize) -> usize {
    if len == 0 { 0 } else { selected.min(len - 1) }
}
