use thiserror::Error;

use crate::notify::{PERMISSIONS_FAIL_MESSAGE, SET_ACCOUNT_MESSAGE};
use crate::store::StoreError;
use crate::upload::UploadError;

/// Failure text for a spreadsheet run whose destination is some other document.
pub const SPREADSHEET_ONLY_MESSAGE: &str =
    "Failed. Records can only be submitted to spreadsheet files.";

#[derive(Error, Debug)]
pub enum AutoSendError {
    #[error("Storage is not mounted")]
    StorageUnavailable,

    #[error("Current network does not match the auto-send setting")]
    NetworkMismatch,

    #[error("Permission to access accounts was denied")]
    PermissionDenied,

    #[error("No valid spreadsheet account is selected")]
    NoAccountSelected,

    #[error("Upload of instance {instance_id} failed: {source}")]
    UploadFailed {
        instance_id: i64,
        #[source]
        source: UploadError,
    },

    #[error("Instance {instance_id} destination '{url}' is not a spreadsheet")]
    DestinationProtocolMismatch { instance_id: i64, url: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AutoSendError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AutoSendError::PermissionDenied => PERMISSIONS_FAIL_MESSAGE.to_string(),
            AutoSendError::NoAccountSelected => SET_ACCOUNT_MESSAGE.to_string(),
            AutoSendError::UploadFailed { source, .. } => source.display_message(),
            AutoSendError::DestinationProtocolMismatch { .. } => {
                SPREADSHEET_ONLY_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether the scheduler should try the run again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AutoSendError::NetworkMismatch | AutoSendError::Store(_))
    }
}
