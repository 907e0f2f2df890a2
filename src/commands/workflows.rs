use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use wfconsole::model::{Workflow, workflows_by_project};
use wfconsole::parser::load_workflows;

use super::ensure_data_dir;

#[derive(Debug, Serialize)]
struct ProjectWorkflows<'a> {
    project_id: &'a str,
    project_name: &'a str,
    workflows: Vec<&'a Workflow>,
}

/// List workflows grouped by project
pub fn run(dir: &Path, project: Option<&str>, json: bool) -> Result<()> {
    ensure_data_dir(dir)?;
    let workflows = load_workflows(dir).context("Failed to load workflows")?;

    let groups: Vec<ProjectWorkflows> = workflows_by_project(&workflows)
        .into_iter()
        .filter(|(p, _)| project.is_none_or(|wanted| p.id == wanted || p.name == wanted))
        .map(|(p, workflows)| ProjectWorkflows {
            project_id: &p.id,
            project_name: &p.name,
            workflows,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No workflows found");
        return Ok(());
    }
    for group in &groups {
        println!("Project {} (id {})", group.project_name, group.project_id);
        for wf in &group.workflows {
            match wf.revision {
                Some(ref rev) => println!("  {:<24} id {:<6} rev {}", wf.name, wf.id, rev),
                None => println!("  {:<24} id {}", wf.name, wf.id),
            }
        }
    }
    Ok(())
}
