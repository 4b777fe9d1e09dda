//! Submission uploads.
//!
//! [`InstanceUploader`] is the per-protocol capability; [`UploadDispatcher`]
//! applies the run's chosen protocol to one instance at a time.

use async_trait::async_trait;

use crate::model::Instance;

pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod response;
pub mod server;
pub mod spreadsheet;

pub use dispatcher::{UploadDispatcher, UploadRoute};
pub use error::UploadError;
pub use outcome::{UploadOutcome, UploadResult, UploadSummary, SUCCESS_MESSAGE};
pub use server::OpenRosaServerUploader;
pub use spreadsheet::{is_spreadsheet_url, SpreadsheetUploader};

/// Uploads single instances over one protocol.
#[async_trait]
pub trait InstanceUploader: Send + Sync {
    /// Resolves where `instance` should be sent.
    fn destination_url(
        &self,
        instance: &Instance,
        device_id: Option<&str>,
    ) -> Result<String, UploadError>;

    /// Sends `instance` to `url`. Returns the server's message, if any.
    async fn upload_one(&self, instance: &Instance, url: &str) -> Result<Option<String>, UploadError>;
}
