use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$RUNWAY_HOME`, else `~/.runway`.
pub fn runway_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RUNWAY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".runway"))
}

pub fn ensure_runway_home() -> Result<PathBuf> {
    let dir = runway_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
