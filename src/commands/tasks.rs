use anyhow::Result;
use std::path::Path;
use wfconsole::config::Config;
use wfconsole::view::{render_tasks, task_rows};

use super::load_attempt_tree;

pub fn run(dir: &Path, attempt_id: &str, json: bool) -> Result<()> {
    let (_attempt, tree) = load_attempt_tree(dir, attempt_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_rows(&tree))?);
        return Ok(());
    }

    let config = Config::load(dir)?;
    let lines = render_tasks(&tree, &config.display);
    if lines.is_empty() {
        println!("No tasks found");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
