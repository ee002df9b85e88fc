//! File System Utilities
//!
//! Configuration and data directory management.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "worklist", "worklist").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/worklist/` or `$XDG_CONFIG_HOME/worklist/`
/// - **macOS**: `~/Library/Application Support/com.worklist.worklist/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\worklist\worklist\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Get the data directory for the stored user profile and log files
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/worklist/`
/// - **macOS**: `~/Library/Application Support/com.worklist.worklist/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\worklist\worklist\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

/// Check if running in development mode
pub fn is_development() -> bool {
    cfg!(debug_assertions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = std::env::temp_dir()
            .join(format!("worklist-fs-{}", uuid::Uuid::new_v4()))
            .join("nested");
        let created = ensure_dir(&dir).expect("create");
        assert!(created.is_dir());
        // Second call is a no-op
        ensure_dir(&dir).expect("exists");
        let _ = fs::remove_dir_all(dir.parent().unwrap_or(&dir));
    }
}
