//! Path utilities for Nixt directory resolution.

use anyhow::Result;
use std::path::PathBuf;

const NIXT_DIR: &str = ".nixt";
const DB_FILE: &str = "nixt.db";
const LOGS_DIR: &str = "logs";

/// Environment variable to override the Nixt directory.
const NIXT_DIR_ENV: &str = "NIXT_DIR";

/// Resolve the Nixt data directory.
/// Priority: NIXT_DIR env var > ~/.nixt/
pub fn resolve_nixt_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(NIXT_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(NIXT_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the Nixt directory exists and return its path.
pub fn ensure_nixt_dir() -> Result<PathBuf> {
    let dir = resolve_nixt_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database path: ~/.nixt/nixt.db
pub fn database_path() -> Result<PathBuf> {
    Ok(resolve_nixt_dir()?.join(DB_FILE))
}

/// Get the logs directory: ~/.nixt/logs/
pub fn logs_dir() -> Result<PathBuf> {
    let dir = ensure_nixt_dir()?.join(LOGS_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
