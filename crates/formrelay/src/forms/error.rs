use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Form '{form_id}' is not available on the server")]
    NotFound { form_id: String },

    #[error("Network error while downloading: {0}")]
    Network(String),

    #[error("Failed to write form file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download cancelled")]
    Cancelled,
}

/// Failure reported by the host when it cannot show a form.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct LaunchError(pub String);

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Form download failed: {0}")]
    DownloadFailed(#[from] DownloadError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to open form: {0}")]
    Launch(#[from] LaunchError),
}
