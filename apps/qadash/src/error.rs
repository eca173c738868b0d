//! Error type shared by the dashboard modules.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (reports, work files, CSV history)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON payloads returned by the CI server
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failures and unexpected HTTP statuses
    #[error("HTTP error: {url}: {message}")]
    Http { url: String, message: String },

    /// Invalid or unreadable qadash.toml|yaml
    #[error("Configuration error: {0}")]
    Config(String),

    /// One entry per variable that is not set
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl Error {
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Exit code used by the binary: usage/config problems map to 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}
