//! User-facing submission notifications.

pub mod broadcaster;

pub use broadcaster::{SubmissionBroadcaster, SubmissionNotice};

/// Messages shown when the spreadsheet protocol cannot run.
pub const PERMISSIONS_FAIL_MESSAGE: &str =
    "Permission to access accounts was denied. Grant it in settings to send forms.";
pub const SET_ACCOUNT_MESSAGE: &str =
    "No spreadsheet account is selected. Choose one in server settings.";

/// Receives the end-of-run summary.
pub trait Notifier: Send + Sync {
    fn on_submission(&self, any_failure: bool, message: &str);
}

/// Notifier that only logs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_submission(&self, any_failure: bool, message: &str) {
        if any_failure {
            log::warn!("Auto-send finished with failures:\n{}", message);
        } else {
            log::info!("Auto-send finished:\n{}", message);
        }
    }
}
