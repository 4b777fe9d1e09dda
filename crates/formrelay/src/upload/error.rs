//! Upload error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::accounts::AccountError;

/// Errors that can occur while submitting one instance.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The destination could not be turned into a URL.
    #[error("Invalid destination url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No destination is configured for this instance.
    #[error("No destination configured for instance {instance_id}")]
    NoDestination { instance_id: i64 },

    /// The payload or an attachment could not be read.
    #[error("Failed to read submission file '{path}': {source}")]
    ReadPayload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not well-formed XML.
    #[error("Failed to parse submission: {0}")]
    ParsePayload(String),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The server requires credentials we do not have or that it refused.
    #[error("Authentication failed for {host}")]
    AuthRequired { host: String },

    /// The server answered with a non-success status.
    #[error("Server rejected submission ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Account error: {0}")]
    Account(#[from] AccountError),
}

impl UploadError {
    /// Text shown to the user for this failure.
    pub fn display_message(&self) -> String {
        match self {
            UploadError::Rejected { status, message } if message.is_empty() => {
                format!("Error: {}", status)
            }
            UploadError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Network(err.to_string())
    }
}
