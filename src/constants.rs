//! Worklist Constants
//!
//! Centralized defaults shared by the table engine, services and binary.

/// Rows per page when the config does not say otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fetch timeout applied to every data source call
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Placeholder shown for absent cell values
pub const EMPTY_CELL: &str = "—";

/// Message shown when a page has no rows
pub const EMPTY_TABLE_MESSAGE: &str = "No data found";

/// Message shown while a fetch is pending
pub const LOADING_MESSAGE: &str = "Loading...";

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "worklist.toml";

/// Stored user profile file name inside the data directory
pub const USER_PROFILE_FILE_NAME: &str = "user.json";

/// Log file prefix for the rolling file appender
pub const LOG_FILE_PREFIX: &str = "worklist.log";

/// EmailJS REST endpoint
pub const EMAIL_SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Value left in freshly generated configs until a real key is filled in
pub const EMAIL_PLACEHOLDER_KEY: &str = "YOUR_PUBLIC_KEY";
