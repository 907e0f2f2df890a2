use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use wfconsole::collapse::CollapseState;
use wfconsole::config::Config;
use wfconsole::model::{Attempt, AttemptStatus};
use wfconsole::view::{TaskRow, TimelineRow, render_tasks, render_timeline, task_rows, timeline_rows};

use super::{format_time, load_attempt_tree};

/// JSON output structure for the attempt command
#[derive(Debug, Serialize)]
struct AttemptDetails<'a> {
    id: &'a str,
    project: &'a str,
    workflow: &'a str,
    session_id: &'a str,
    status: AttemptStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_attempt_name: Option<&'a str>,
    timeline: Vec<TimelineRow>,
    tasks: Vec<TaskRow>,
}

/// Show an attempt: header, timeline and tasks sections
pub fn run(dir: &Path, attempt_id: &str, json: bool) -> Result<()> {
    let (attempt, tree) = load_attempt_tree(dir, attempt_id)?;
    let store = CollapseState::new();

    if json {
        let details = AttemptDetails {
            id: &attempt.id,
            project: &attempt.project.name,
            workflow: &attempt.workflow.name,
            session_id: &attempt.session_id,
            status: attempt.status(),
            retry_attempt_name: attempt.retry_attempt_name.as_deref(),
            timeline: timeline_rows(&tree, &store),
            tasks: task_rows(&tree),
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    let config = Config::load(dir)?;
    for line in header_lines(&attempt) {
        println!("{}", line);
    }
    println!();
    println!("Timeline");
    for line in render_timeline(&tree, &store, &config.display) {
        println!("  {}", line);
    }
    println!();
    println!("Tasks");
    for line in render_tasks(&tree, &config.display) {
        println!("  {}", line);
    }

    let placeholders = tree.placeholders().count();
    if placeholders > 0 {
        println!();
        println!(
            "Note: {} task(s) have no record in this snapshot and are shown as placeholders",
            placeholders
        );
    }
    Ok(())
}

fn header_lines(attempt: &Attempt) -> Vec<String> {
    let mut lines = vec![
        format!("Attempt {}", attempt.id),
        format!("  Project:  {} (id {})", attempt.project.name, attempt.project.id),
        format!("  Workflow: {} (id {})", attempt.workflow.name, attempt.workflow.id),
        format!("  Session:  {} ({})", attempt.session_id, attempt.session_uuid),
        format!("  Status:   {}", attempt.status()),
    ];
    if let Some(ref name) = attempt.retry_attempt_name {
        lines.push(format!("  Retry:    {}", name));
    }
    lines.push(format!("  Created:  {}", format_time(attempt.created_at)));
    lines.push(format!("  Finished: {}", format_time(attempt.finished_at)));
    lines
}
