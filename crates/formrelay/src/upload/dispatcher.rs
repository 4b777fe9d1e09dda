//! Routes one instance to the uploader chosen for the run.

use std::sync::Arc;

use log::{debug, warn};

use super::spreadsheet::is_spreadsheet_url;
use super::InstanceUploader;
use crate::autosend::AutoSendError;
use crate::config::Protocol;
use crate::model::{Instance, InstanceStatus};
use crate::sanitize::redact_url;
use crate::store::InstanceStore;

/// The protocol picked for a run together with its bound uploader.
pub enum UploadRoute {
    Server {
        uploader: Arc<dyn InstanceUploader>,
        device_id: Option<String>,
    },
    Spreadsheet {
        uploader: Arc<dyn InstanceUploader>,
    },
}

impl UploadRoute {
    pub fn protocol(&self) -> Protocol {
        match self {
            UploadRoute::Server { .. } => Protocol::Server,
            UploadRoute::Spreadsheet { .. } => Protocol::GoogleSheets,
        }
    }

    /// Analytics action recorded for a successful automatic upload.
    pub fn analytics_action(&self) -> &'static str {
        match self {
            UploadRoute::Server { .. } => "HTTP auto",
            UploadRoute::Spreadsheet { .. } => "HTTP-Sheets auto",
        }
    }

    fn uploader(&self) -> &dyn InstanceUploader {
        match self {
            UploadRoute::Server { uploader, .. } | UploadRoute::Spreadsheet { uploader } => {
                uploader.as_ref()
            }
        }
    }

    fn device_id(&self) -> Option<&str> {
        match self {
            UploadRoute::Server { device_id, .. } => device_id.as_deref(),
            UploadRoute::Spreadsheet { .. } => None,
        }
    }
}

/// Submits instances one at a time and records their new status.
pub struct UploadDispatcher {
    route: UploadRoute,
    instances: Arc<dyn InstanceStore>,
}

impl UploadDispatcher {
    pub fn new(route: UploadRoute, instances: Arc<dyn InstanceStore>) -> Self {
        Self { route, instances }
    }

    pub fn route(&self) -> &UploadRoute {
        &self.route
    }

    /// Uploads one instance. Returns the server's custom message, if any.
    ///
    /// A spreadsheet run whose destination is not a spreadsheet fails
    /// without contacting the uploader and leaves the status untouched.
    pub async fn submit(&self, instance: &Instance) -> Result<Option<String>, AutoSendError> {
        let uploader = self.route.uploader();

        let url = match uploader.destination_url(instance, self.route.device_id()) {
            Ok(url) => url,
            Err(source) => {
                self.mark(instance, InstanceStatus::SubmissionFailed);
                return Err(AutoSendError::UploadFailed {
                    instance_id: instance.id,
                    source,
                });
            }
        };

        if self.route.protocol() == Protocol::GoogleSheets && !is_spreadsheet_url(&url) {
            return Err(AutoSendError::DestinationProtocolMismatch {
                instance_id: instance.id,
                url: redact_url(&url),
            });
        }

        debug!("Uploading instance {} to {}", instance.id, redact_url(&url));
        match uploader.upload_one(instance, &url).await {
            Ok(message) => {
                self.mark(instance, InstanceStatus::Submitted);
                Ok(message)
            }
            Err(source) => {
                self.mark(instance, InstanceStatus::SubmissionFailed);
                Err(AutoSendError::UploadFailed {
                    instance_id: instance.id,
                    source,
                })
            }
        }
    }

    fn mark(&self, instance: &Instance, status: InstanceStatus) {
        // The upload outcome stands even if the bookkeeping fails.
        if let Err(e) = self.instances.update_status(instance.id, status) {
            warn!(
                "Failed to mark instance {} as {}: {}",
                instance.id, status, e
            );
        }
    }
}
