//! Per-instance upload results aggregated over one auto-send run.

use std::fmt::Write;

/// Message recorded for a successful upload without a server message.
pub const SUCCESS_MESSAGE: &str = "Success";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success(String),
    Failure(String),
}

impl UploadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, UploadOutcome::Failure(_))
    }

    pub fn message(&self) -> &str {
        match self {
            UploadOutcome::Success(m) | UploadOutcome::Failure(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub instance_id: i64,
    /// Captured before the upload so the summary survives auto-delete.
    pub display_name: String,
    pub outcome: UploadOutcome,
}

/// Results of one run, keyed by instance id.
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    results: Vec<UploadResult>,
}

impl UploadSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for an instance, replacing an earlier one.
    pub fn record(&mut self, instance_id: i64, display_name: &str, outcome: UploadOutcome) {
        self.results.retain(|r| r.instance_id != instance_id);
        self.results.push(UploadResult {
            instance_id,
            display_name: display_name.to_string(),
            outcome,
        });
    }

    pub fn any_failure(&self) -> bool {
        self.results.iter().any(|r| r.outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failure()).count()
    }

    pub fn results(&self) -> &[UploadResult] {
        &self.results
    }

    pub fn get(&self, instance_id: i64) -> Option<&UploadOutcome> {
        self.results
            .iter()
            .find(|r| r.instance_id == instance_id)
            .map(|r| &r.outcome)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// User-facing text: one `name - message` line per instance, ordered by
    /// display name.
    pub fn message(&self) -> String {
        let mut sorted: Vec<&UploadResult> = self.results.iter().collect();
        sorted.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then(a.instance_id.cmp(&b.instance_id))
        });

        let mut output = String::new();
        for result in sorted {
            // Writing to a String cannot fail.
            let _ = write!(
                output,
                "{} - {}\n\n",
                result.display_name,
                result.outcome.message()
            );
        }
        output.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = UploadSummary::new();
        assert!(summary.is_empty());
        assert!(!summary.any_failure());
        assert_eq!(summary.message(), "");
    }

    #[test]
    fn test_message_lists_every_instance_sorted_by_name() {
        let mut summary = UploadSummary::new();
        summary.record(2, "Water point", UploadOutcome::Failure("Network error".into()));
        summary.record(1, "Household", UploadOutcome::Success(SUCCESS_MESSAGE.into()));

        assert!(summary.any_failure());
        assert_eq!(summary.failure_count(), 1);
        assert_eq!(
            summary.message(),
            "Household - Success\n\nWater point - Network error"
        );
    }

    #[test]
    fn test_record_replaces_previous_outcome() {
        let mut summary = UploadSummary::new();
        summary.record(1, "Household", UploadOutcome::Failure("first".into()));
        summary.record(1, "Household", UploadOutcome::Success("second".into()));

        assert_eq!(summary.results().len(), 1);
        assert_eq!(summary.get(1), Some(&UploadOutcome::Success("second".into())));
        assert!(!summary.any_failure());
    }
}
