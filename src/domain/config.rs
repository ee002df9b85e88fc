//! Config - Application Configuration
//!
//! Loaded from `worklist.toml` in the platform config directory:
//!
//! ```toml
//! [worklist]
//! page_size = 10
//! fetch_timeout_secs = 30
//! refetch_on_change = true
//! endpoint = "https://example.org/api/orders"   # optional
//!
//! [email]
//! service_id = "service_x"
//! template_id = "template_y"
//! public_key = "abc123"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_PAGE_SIZE, EMAIL_PLACEHOLDER_KEY, EMAIL_SEND_ENDPOINT,
    FETCH_TIMEOUT_SECS,
};
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Table and data source settings
    pub worklist: WorklistConfig,
    /// Result notification settings
    pub email: EmailConfig,
}

/// Table and data source settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorklistConfig {
    /// Rows per page
    pub page_size: usize,
    /// Upper bound for every data source call
    pub fetch_timeout_secs: u64,
    /// Refetch from the data source on every query change, or reprocess the
    /// cached rows locally
    pub refetch_on_change: bool,
    /// Remote endpoint used when no other data source is wired in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for WorklistConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            refetch_on_change: true,
            endpoint: None,
        }
    }
}

impl WorklistConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// EmailJS-style notification settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// REST endpoint that accepts the send request
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: EMAIL_PLACEHOLDER_KEY.to_string(),
            endpoint: EMAIL_SEND_ENDPOINT.to_string(),
        }
    }
}

impl EmailConfig {
    /// A missing or placeholder public key means sending is disabled
    pub fn is_configured(&self) -> bool {
        let key = self.public_key.trim();
        !key.is_empty() && key != EMAIL_PLACEHOLDER_KEY
    }
}

impl AppConfig {
    /// Reject values the worklist cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.worklist.page_size == 0 {
            return Err(Error::Invalid {
                message: "worklist.page_size must be greater than zero".to_string(),
            });
        }
        if self.worklist.fetch_timeout_secs == 0 {
            return Err(Error::Invalid {
                message: "worklist.fetch_timeout_secs must be greater than zero".to_string(),
            });
        }
        if let Some(endpoint) = &self.worklist.endpoint {
            reqwest::Url::parse(endpoint).map_err(|e| Error::Invalid {
                message: format!("worklist.endpoint is not a valid URL: {e}"),
            })?;
        }
        Ok(())
    }

    /// Parse and validate TOML text; blank text gives the defaults
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = ?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }
        info!(path = ?path, "Loading config file");
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to load config file");
            e
        })
    }

    /// Load from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Write as TOML to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let value = toml::to_string_pretty(self)?;
        std::fs::write(path, value)?;
        Ok(())
    }
}

/// Config file path inside the platform config directory
pub fn config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE_NAME))
}
