use anyhow::{Context, Result};
use std::path::Path;
use wfconsole::config::Config;
use wfconsole::parser::load_sessions;
use wfconsole::sessions::{SessionListItem, StatusFilter, filter_sessions_by_status};

use super::ensure_data_dir;

/// List sessions, optionally narrowed to one status.
/// Without `--status` the configured default filter applies.
pub fn run(dir: &Path, status: Option<&str>, json: bool) -> Result<()> {
    ensure_data_dir(dir)?;
    let config = Config::load(dir)?;
    let filter = match status {
        Some(s) => StatusFilter::from(s),
        None => config.sessions.default_filter(),
    };
    if let StatusFilter::Unrecognized(value) = &filter {
        tracing::warn!(status = %value, "unknown status filter; no session will match");
    }

    let sessions = load_sessions(dir).context("Failed to load sessions")?;
    let items: Vec<SessionListItem> = sessions.iter().map(SessionListItem::from).collect();
    let shown = filter_sessions_by_status(&items, &filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("Sessions (status: {})", filter);
    if shown.is_empty() {
        println!("  No sessions found");
        return Ok(());
    }
    for line in format_rows(&shown) {
        println!("{}", line);
    }
    Ok(())
}

fn format_rows(items: &[&SessionListItem]) -> Vec<String> {
    let project_w = column_width(items, |s| &s.project_name, "Project");
    let workflow_w = column_width(items, |s| &s.workflow_name, "Workflow");
    let mut lines = vec![format!(
        "  {:<4} {:<project_w$} {:<workflow_w$} {:<36} {}",
        "ID", "Project", "Workflow", "Session UUID", "Status"
    )];
    for s in items {
        lines.push(format!(
            "  {:<4} {:<project_w$} {:<workflow_w$} {:<36} {}",
            s.id, s.project_name, s.workflow_name, s.session_uuid, s.status
        ));
    }
    lines
}

fn column_width<F>(items: &[&SessionListItem], field: F, header: &str) -> usize
where
    F: Fn(&SessionListItem) -> &String,
{
    items
        .iter()
        .map(|s| field(*s).len())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wfconsole::model::AttemptStatus;
    use wfconsole::test_helpers::{make_session, setup_snapshot};

    #[test]
    fn format_rows_aligns_columns() {
        let items: Vec<SessionListItem> = vec![
            make_session("1", "basic", AttemptStatus::Success).to_list_item(),
            make_session("2", "generate_subtasks", AttemptStatus::Failure).to_list_item(),
        ];
        let refs: Vec<&SessionListItem> = items.iter().collect();
        let lines = format_rows(&refs);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("basic"));
        assert!(lines[2].ends_with("Failure"));
        let status_col = lines[0].find("Status").unwrap();
        assert_eq!(lines[1].find("Success").unwrap(), status_col);
    }

    #[test]
    fn run_with_unknown_status_succeeds() {
        let dir = TempDir::new().unwrap();
        setup_snapshot(
            dir.path(),
            &[],
            vec![make_session("1", "basic", AttemptStatus::Success)],
            Vec::new(),
        );
        run(dir.path(), Some("exploded"), false).unwrap();
        run(dir.path(), Some("success"), true).unwrap();
    }
}
