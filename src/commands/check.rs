use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use wfconsole::parser::load_attempt;
use wfconsole::tree::{ParentIdMismatch, TaskTree, build_task_tree};

use super::ensure_data_dir;

#[derive(Serialize, Debug, Default, PartialEq)]
struct CheckJsonOutput {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    placeholders: Vec<String>,
    parent_mismatches: Vec<ParentIdMismatch>,
    root_tasks: Vec<String>,
    record_count: usize,
    node_count: usize,
    warnings: usize,
    errors: usize,
}

fn check_tree(record_count: usize, tree: &TaskTree) -> CheckJsonOutput {
    let placeholders: Vec<String> = tree.placeholders().map(|n| n.key().to_string()).collect();
    let root_tasks: Vec<String> = tree.root_tasks().map(|n| n.key().to_string()).collect();
    let parent_mismatches = tree.parent_id_mismatches();
    let multiple_roots = usize::from(root_tasks.len() > 1);
    CheckJsonOutput {
        ok: true,
        error: None,
        warnings: placeholders.len() + parent_mismatches.len() + multiple_roots,
        placeholders,
        parent_mismatches,
        root_tasks,
        record_count,
        node_count: tree.len(),
        errors: 0,
    }
}

pub fn run(dir: &Path, attempt_id: &str, json: bool) -> Result<()> {
    ensure_data_dir(dir)?;
    let attempt = load_attempt(dir, attempt_id).context("Failed to load attempt")?;

    let output = match build_task_tree(&attempt.tasks) {
        Ok(tree) => check_tree(attempt.tasks.len(), &tree),
        Err(e) => CheckJsonOutput {
            ok: false,
            error: Some(e.to_string()),
            record_count: attempt.tasks.len(),
            errors: 1,
            ..CheckJsonOutput::default()
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(ref error) = output.error {
        eprintln!("Error: {}", error);
        anyhow::bail!("Attempt {} has an invalid task list", attempt_id);
    }

    // Placeholders are warnings (upstream data may be truncated)
    if !output.placeholders.is_empty() {
        eprintln!("Warning: Tasks implied by a name but missing from the list:");
        for key in &output.placeholders {
            eprintln!("  {}", key);
        }
    }

    if !output.parent_mismatches.is_empty() {
        eprintln!("Warning: Tasks whose parent id disagrees with their name:");
        for mismatch in &output.parent_mismatches {
            eprintln!("  {}", mismatch);
        }
    }

    if output.root_tasks.len() > 1 {
        eprintln!(
            "Warning: Multiple root tasks: {}",
            output.root_tasks.join(", ")
        );
    }

    if output.warnings > 0 {
        println!(
            "Attempt {} OK: {} tasks, {} warning(s)",
            attempt_id, output.node_count, output.warnings
        );
    } else {
        println!("Attempt {} OK: {} tasks, no issues found", attempt_id, output.node_count);
    }
    Ok(())
}
