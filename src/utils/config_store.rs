//! ConfigStore - Local JSON Storage
//!
//! Small JSON documents kept in a directory (the platform data directory by
//! default).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

use crate::helpers::get_or_create_data_dir;

/// Get the application data directory
pub fn app_data_dir() -> Result<PathBuf> {
    Ok(get_or_create_data_dir()?)
}

/// Load a JSON file; `None` when it does not exist
pub fn load_json<T: DeserializeOwned>(dir: &Path, filename: &str) -> Result<Option<T>> {
    let path = dir.join(filename);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let value: T = serde_json::from_str(&content)?;
    Ok(Some(value))
}

/// Save a JSON file, creating the directory when needed
pub fn save_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(dir.join(filename), content)?;
    Ok(())
}

/// Delete a JSON file; missing files are fine
pub fn delete_json(dir: &Path, filename: &str) -> Result<()> {
    let path = dir.join(filename);
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}
