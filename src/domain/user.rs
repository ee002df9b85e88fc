//! User - Registered user profile
//!
//! The profile is remembered between runs as `user.json` in the data
//! directory. A missing or unreadable file simply means nobody is registered.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::USER_PROFILE_FILE_NAME;
use crate::error::{Error, Result};
use crate::utils::config_store::{app_data_dir, delete_json, load_json, save_json};

/// Person who receives the result notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserProfile {
    /// Trimmed, validated profile
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self> {
        let profile = Self {
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            email: email.into().trim().to_string(),
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(Error::Invalid {
                message: "first and last name are required".to_string(),
            });
        }
        let valid_email = self
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(Error::Invalid {
                message: format!("invalid email address: {}", self.email),
            });
        }
        Ok(())
    }
}

/// Stores the profile as JSON inside one directory
#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform data directory
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(app_data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The remembered profile; a corrupt file is logged and ignored
    pub fn load(&self) -> Option<UserProfile> {
        match load_json::<UserProfile>(&self.dir, USER_PROFILE_FILE_NAME) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, dir = ?self.dir, "Stored user profile is unreadable");
                None
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> anyhow::Result<()> {
        save_json(&self.dir, USER_PROFILE_FILE_NAME, profile)?;
        tracing::info!(email = %profile.email, "User profile saved");
        Ok(())
    }

    /// Forget the remembered profile
    pub fn forget(&self) -> anyhow::Result<()> {
        delete_json(&self.dir, USER_PROFILE_FILE_NAME)?;
        tracing::info!("User profile removed");
        Ok(())
    }
}
