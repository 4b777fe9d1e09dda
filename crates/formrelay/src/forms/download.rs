//! Form download capability and its progress reporting.

use async_trait::async_trait;

use super::error::DownloadError;
use crate::model::Form;

/// Events emitted while forms are downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Started { form_id: String },
    Progress { form_id: String, completed: usize, total: usize },
    Completed { form_id: String },
    Failed { form_id: String, error: String },
}

pub trait DownloadProgress: Send + Sync {
    fn report(&self, event: DownloadEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl DownloadProgress for NoopProgress {
    fn report(&self, _event: DownloadEvent) {}
}

/// Reporter that writes events to the log.
pub struct LogProgress;

impl DownloadProgress for LogProgress {
    fn report(&self, event: DownloadEvent) {
        match event {
            DownloadEvent::Started { form_id } => log::info!("Downloading form {}", form_id),
            DownloadEvent::Progress {
                form_id,
                completed,
                total,
            } => log::debug!("Form {}: {}/{} files", form_id, completed, total),
            DownloadEvent::Completed { form_id } => log::info!("Downloaded form {}", form_id),
            DownloadEvent::Failed { form_id, error } => {
                log::warn!("Download of form {} failed: {}", form_id, error)
            }
        }
    }
}

/// Fetches form definitions from the server into the local form store.
#[async_trait]
pub trait FormDownloader: Send + Sync {
    /// Downloads one form and returns the stored definition.
    async fn download_form_by_id(
        &self,
        form_id: &str,
        progress: &dyn DownloadProgress,
    ) -> Result<Form, DownloadError>;

    /// Downloads every form the project requires.
    async fn download_required_forms(
        &self,
        progress: &dyn DownloadProgress,
    ) -> Result<(), DownloadError>;
}
