//! Analytics sink.

/// Event category for uploads.
pub const SUBMISSION: &str = "Submission";

pub trait Analytics: Send + Sync {
    fn log_event(&self, category: &str, action: &str, label: &str);
}

/// Discards events.
pub struct NoopAnalytics;

impl Analytics for NoopAnalytics {
    fn log_event(&self, _category: &str, _action: &str, _label: &str) {}
}

/// Writes events to the `analytics` tracing target.
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn log_event(&self, category: &str, action: &str, label: &str) {
        tracing::info!(target: "analytics", category, action, label, "analytics event");
    }
}
