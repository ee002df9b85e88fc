//! Error types for Worklist
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the crate
#[derive(Debug, Snafu)]
pub enum Error {
    /// Worklist wiring is unusable (no data source, duplicate column keys)
    #[snafu(display("Configuration error: {message}"))]
    Configuration { message: String },

    /// Remote endpoint answered with a non-success status
    #[snafu(display("API error: {message}"))]
    Network { status: Option<u16>, message: String },

    /// HTTP transport failure
    #[snafu(display("Request error: {source}"))]
    Request { source: reqwest::Error },

    /// Invalid input or configuration value
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// Timeout error
    #[snafu(display("Timeout: {message}"))]
    Timeout { message: String },
}

impl Error {
    /// Whether the worklist instance can keep operating after this error.
    ///
    /// Configuration errors are fatal to the instance, everything else is
    /// shown inline and cleared by the next successful fetch.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Configuration { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Request { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
