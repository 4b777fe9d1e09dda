//! Broadcasts submission notices to any number of listeners.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use super::Notifier;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionNotice {
    pub timestamp: DateTime<Utc>,
    pub any_failure: bool,
    pub message: String,
}

impl SubmissionNotice {
    pub fn new(any_failure: bool, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            any_failure,
            message: message.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct SubmissionBroadcaster {
    sender: broadcast::Sender<SubmissionNotice>,
}

impl SubmissionBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionNotice> {
        self.sender.subscribe()
    }
}

impl Default for SubmissionBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for SubmissionBroadcaster {
    fn on_submission(&self, any_failure: bool, message: &str) {
        // No active receivers is fine.
        let _ = self.sender.send(SubmissionNotice::new(any_failure, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_receive_notice() {
        let broadcaster = SubmissionBroadcaster::default();
        let mut rx = broadcaster.subscribe();

        broadcaster.on_submission(true, "household - Network error");

        let notice = rx.try_recv().unwrap();
        assert!(notice.any_failure);
        assert_eq!(notice.message, "household - Network error");
    }

    #[test]
    fn test_send_without_receivers_does_not_panic() {
        let broadcaster = SubmissionBroadcaster::new(4);
        broadcaster.on_submission(false, "ok");
    }

    #[test]
    fn test_notice_serializes_camel_case() {
        let json = serde_json::to_value(SubmissionNotice::new(false, "done")).unwrap();
        assert_eq!(json["anyFailure"], false);
        assert_eq!(json["message"], "done");
    }
}
