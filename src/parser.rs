//! Snapshot files.
//!
//! Sessions, workflows and attempts are fetched by an external client and
//! stored as JSON documents in the data directory:
//!
//! ```text
//! <dir>/sessions.json          {"sessions": [...]}
//! <dir>/workflows.json         {"workflows": [...]}
//! <dir>/attempts/<id>.json     attempt object with its "tasks"
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::model::{Attempt, Session, Workflow};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{what} not found: {}", .path.display())]
    NotFound { what: String, path: PathBuf },
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SessionsFile {
    #[serde(default)]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct WorkflowsFile {
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

pub fn sessions_path(dir: &Path) -> PathBuf {
    dir.join("sessions.json")
}

pub fn workflows_path(dir: &Path) -> PathBuf {
    dir.join("workflows.json")
}

pub fn attempt_path(dir: &Path, attempt_id: &str) -> PathBuf {
    dir.join("attempts").join(format!("{}.json", attempt_id))
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, ParseError> {
    if !path.exists() {
        return Err(ParseError::NotFound {
            what: what.to_string(),
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        ParseError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), what, "loaded snapshot");
    Ok(value)
}

/// Load the session list; a missing file is an empty list
pub fn load_sessions(dir: &Path) -> Result<Vec<Session>, ParseError> {
    let path = sessions_path(dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file: SessionsFile = read_json(&path, "sessions")?;
    Ok(file.sessions)
}

/// Load the workflow list; a missing file is an empty list
pub fn load_workflows(dir: &Path) -> Result<Vec<Workflow>, ParseError> {
    let path = workflows_path(dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file: WorkflowsFile = read_json(&path, "workflows")?;
    Ok(file.workflows)
}

pub fn load_attempt(dir: &Path, attempt_id: &str) -> Result<Attempt, ParseError> {
    read_json(&attempt_path(dir, attempt_id), &format!("attempt {}", attempt_id))
}

/// Write a snapshot document atomically (temp file + rename)
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ParseError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;
    let tmp_path = parent.join(format!(".snapshot.tmp.{}", std::process::id()));

    let result = (|| -> Result<(), ParseError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        let json = serde_json::to_string_pretty(value).map_err(|source| ParseError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    })();

    if result.is_ok() {
        std::fs::rename(&tmp_path, path)?;
    } else {
        let _ = std::fs::remove_file(&tmp_path);
    }

    result
}

pub fn save_sessions(dir: &Path, sessions: Vec<Session>) -> Result<(), ParseError> {
    save_json(&SessionsFile { sessions }, &sessions_path(dir))
}

pub fn save_workflows(dir: &Path, workflows: Vec<Workflow>) -> Result<(), ParseError> {
    save_json(&WorkflowsFile { workflows }, &workflows_path(dir))
}

pub fn save_attempt(dir: &Path, attempt: &Attempt) -> Result<(), ParseError> {
    save_json(attempt, &attempt_path(dir, &attempt.id))
}
