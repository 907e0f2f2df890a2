use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use wfconsole::config::Config;

pub fn run(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir.join("attempts")).context("Failed to create data directory")?;

    if Config::init(dir)? {
        println!("Initialized wfconsole data directory at {}", dir.display());
    } else {
        println!("Config already exists at {}", dir.join("config.toml").display());
    }
    Ok(())
}
