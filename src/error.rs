//! Error types shared by every pipeline stage

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while mining a repository
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed repository reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("Label '{label}' does not exist on {repository}")]
    UnknownLabel { label: String, repository: String },

    #[error("Request to {url} timed out")]
    NetworkTimeout { url: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("Invalid report path {path:?}: {reason}")]
    InvalidReportPath { path: PathBuf, reason: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        Error::MalformedReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from a blocking call exceeding its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::NetworkTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
