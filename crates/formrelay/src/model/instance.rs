use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a filled-out form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceStatus {
    Incomplete,
    Complete,
    Submitted,
    SubmissionFailed,
}

impl InstanceStatus {
    /// Statuses that make an instance eligible for upload.
    pub const FINALIZED: [InstanceStatus; 2] =
        [InstanceStatus::Complete, InstanceStatus::SubmissionFailed];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Incomplete => "incomplete",
            InstanceStatus::Complete => "complete",
            InstanceStatus::Submitted => "submitted",
            InstanceStatus::SubmissionFailed => "submissionFailed",
        }
    }

    pub fn is_finalized(&self) -> bool {
        Self::FINALIZED.contains(self)
    }

    /// Whether a status change from `self` to `next` is allowed.
    ///
    /// Statuses only move forward, except that a failed submission may be
    /// queued again (`SubmissionFailed -> Complete`). Rewriting the current
    /// status is always allowed.
    pub fn can_transition_to(&self, next: InstanceStatus) -> bool {
        use InstanceStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Incomplete, Complete)
                | (Complete, Submitted)
                | (Complete, SubmissionFailed)
                | (SubmissionFailed, Complete)
                | (SubmissionFailed, Submitted)
        )
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(InstanceStatus::Incomplete),
            "complete" => Ok(InstanceStatus::Complete),
            "submitted" => Ok(InstanceStatus::Submitted),
            "submissionFailed" => Ok(InstanceStatus::SubmissionFailed),
            other => Err(format!("unknown instance status '{}'", other)),
        }
    }
}

/// One filled-out form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Database identifier. Zero until the instance has been stored.
    pub id: i64,
    pub display_name: String,
    pub form_id: String,
    pub form_version: Option<String>,
    pub status: InstanceStatus,
    /// Path to the instance XML payload. Attachments live next to it.
    pub instance_path: PathBuf,
    /// Destination override taken from the form's submission element.
    pub submission_uri: Option<String>,
    pub last_status_change: DateTime<Utc>,
}

impl Instance {
    /// Creates an unsaved instance for the given form.
    pub fn new(
        form_id: impl Into<String>,
        form_version: Option<String>,
        instance_path: PathBuf,
        status: InstanceStatus,
    ) -> Self {
        let form_id = form_id.into();
        Self {
            id: 0,
            display_name: form_id.clone(),
            form_id,
            form_version,
            status,
            instance_path,
            submission_uri: None,
            last_status_change: Utc::now(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_submission_uri(mut self, uri: impl Into<String>) -> Self {
        self.submission_uri = Some(uri.into());
        self
    }

    /// Directory holding the payload and its media attachments.
    pub fn instance_dir(&self) -> Option<&std::path::Path> {
        self.instance_path.parent()
    }
}
