pub mod attempt;
pub mod check;
pub mod init;
pub mod session;
pub mod sessions;
pub mod tasks;
pub mod timeline;
pub mod workflows;

use std::path::Path;

use anyhow::{Context, Result};
use wfconsole::model::Attempt;
use wfconsole::parser::load_attempt;
use wfconsole::tree::{TaskTree, build_task_tree};

/// Fail early with a hint when the data directory is missing
pub fn ensure_data_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "No data directory at {}. Run 'wfc init' first.",
            dir.display()
        );
    }
    Ok(())
}

/// Load an attempt snapshot and build its task tree.
pub fn load_attempt_tree(dir: &Path, attempt_id: &str) -> Result<(Attempt, TaskTree)> {
    ensure_data_dir(dir)?;
    let attempt = load_attempt(dir, attempt_id).context("Failed to load attempt")?;
    let tree = build_task_tree(&attempt.tasks)
        .with_context(|| format!("Attempt {} has an invalid task list", attempt_id))?;
    Ok((attempt, tree))
}

/// Format an optional timestamp for display
pub fn format_time(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
