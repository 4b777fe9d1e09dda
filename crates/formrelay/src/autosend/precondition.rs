//! Gate evaluated before an auto-send run touches any instance.

/// What a run should do before fetching candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Stop; nothing needs to be retried.
    SkipOk,
    /// Stop; try again on the next trigger.
    SkipRetry,
    /// Go on with the upload.
    Proceed,
}

impl Precondition {
    /// Decides the precondition from the storage state and the network match.
    ///
    /// `any_form_auto_send` is only consulted when storage is mounted and the
    /// network does not match.
    pub fn evaluate<F, E>(
        storage_mounted: bool,
        network_matches: bool,
        any_form_auto_send: F,
    ) -> Result<Self, E>
    where
        F: FnOnce() -> Result<bool, E>,
    {
        if !storage_mounted {
            return Ok(if network_matches {
                Precondition::SkipOk
            } else {
                Precondition::SkipRetry
            });
        }

        if network_matches || any_form_auto_send()? {
            Ok(Precondition::Proceed)
        } else {
            Ok(Precondition::SkipRetry)
        }
    }
}
