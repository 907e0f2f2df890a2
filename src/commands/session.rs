use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use wfconsole::model::AttemptStatus;
use wfconsole::parser::load_sessions;

use super::{ensure_data_dir, format_time};

/// JSON output structure for the session command
#[derive(Debug, Serialize)]
struct SessionDetails<'a> {
    id: &'a str,
    project_id: &'a str,
    project_name: &'a str,
    workflow_id: &'a str,
    workflow_name: &'a str,
    session_uuid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_attempt_id: Option<&'a str>,
    status: AttemptStatus,
}

pub fn run(dir: &Path, session_id: &str, json: bool) -> Result<()> {
    ensure_data_dir(dir)?;
    let sessions = load_sessions(dir).context("Failed to load sessions")?;
    let session = sessions
        .iter()
        .find(|s| s.id == session_id)
        .ok_or_else(|| anyhow::anyhow!("Session '{}' not found", session_id))?;

    if json {
        let details = SessionDetails {
            id: &session.id,
            project_id: &session.project.id,
            project_name: &session.project.name,
            workflow_id: &session.workflow.id,
            workflow_name: &session.workflow.name,
            session_uuid: &session.session_uuid,
            last_attempt_id: session.last_attempt_id(),
            status: session.status(),
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("Session {}", session.id);
    println!("  Project:  {} (id {})", session.project.name, session.project.id);
    println!("  Workflow: {} (id {})", session.workflow.name, session.workflow.id);
    println!("  UUID:     {}", session.session_uuid);
    println!("  Time:     {}", format_time(session.session_time));
    match session.last_attempt_id() {
        Some(attempt_id) => println!("  Status:   {} (attempt {})", session.status(), attempt_id),
        None => println!("  Status:   {}", session.status()),
    }
    Ok(())
}
