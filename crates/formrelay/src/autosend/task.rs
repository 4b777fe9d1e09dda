//! One auto-send run: gate, select, upload, clean up, notify.

use std::sync::Arc;

use log::{debug, info, warn};
use tracing::{info_span, Instrument};

use super::error::AutoSendError;
use super::fetcher::{
    at_least_one_form_specifies_auto_send, form_should_be_auto_deleted, instances_to_auto_send,
};
use super::precondition::Precondition;
use crate::accounts::AccountAccess;
use crate::analytics::{self, Analytics};
use crate::config::{Protocol, Settings};
use crate::model::Instance;
use crate::network::{network_type_matches, NetworkStateProvider};
use crate::notify::Notifier;
use crate::sanitize::hash_form_identifier;
use crate::storage::StorageState;
use crate::store::{FormStore, InstanceStore};
use crate::upload::{
    InstanceUploader, UploadDispatcher, UploadOutcome, UploadRoute, UploadSummary,
    SUCCESS_MESSAGE,
};

/// Collaborators an auto-send run works with.
pub struct AutoSendContext {
    pub settings: Settings,
    pub storage: Arc<dyn StorageState>,
    pub network: Arc<dyn NetworkStateProvider>,
    pub instances: Arc<dyn InstanceStore>,
    pub forms: Arc<dyn FormStore>,
    pub accounts: Arc<dyn AccountAccess>,
    pub server_uploader: Arc<dyn InstanceUploader>,
    pub spreadsheet_uploader: Arc<dyn InstanceUploader>,
    pub notifier: Arc<dyn Notifier>,
    pub analytics: Arc<dyn Analytics>,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing to do.
    Skipped,
    /// Stopped before uploading anything.
    Aborted(AutoSendError),
    /// Every candidate was attempted.
    Completed(UploadSummary),
}

impl RunOutcome {
    /// False when the run should be retried later.
    pub fn is_done(&self) -> bool {
        match self {
            RunOutcome::Skipped | RunOutcome::Completed(_) => true,
            RunOutcome::Aborted(e) => !e.is_retryable(),
        }
    }
}

pub struct AutoSendTask {
    ctx: AutoSendContext,
}

impl AutoSendTask {
    pub fn new(ctx: AutoSendContext) -> Self {
        Self { ctx }
    }

    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    /// Runs once. Returns `true` when no retry is needed.
    pub async fn run(&self) -> bool {
        self.execute().await.is_done()
    }

    /// Runs once and reports what happened.
    pub async fn execute(&self) -> RunOutcome {
        let span = info_span!("auto_send", protocol = ?self.ctx.settings.protocol);
        self.execute_inner().instrument(span).await
    }

    async fn execute_inner(&self) -> RunOutcome {
        let ctx = &self.ctx;

        if ctx.storage.is_migration_in_progress() {
            info!("Storage migration in progress, skipping auto-send");
            return RunOutcome::Skipped;
        }

        let network = ctx.network.current_network();
        let matches = network_type_matches(ctx.settings.auto_send, network);
        let precondition = Precondition::evaluate(ctx.storage.is_mounted(), matches, || {
            at_least_one_form_specifies_auto_send(ctx.forms.as_ref())
        });

        match precondition {
            Ok(Precondition::Proceed) => {}
            Ok(Precondition::SkipOk) => {
                debug!("Storage not mounted, skipping auto-send");
                return RunOutcome::Aborted(AutoSendError::StorageUnavailable);
            }
            Ok(Precondition::SkipRetry) => {
                debug!("Network {:?} does not allow auto-send, retrying later", network);
                return RunOutcome::Aborted(AutoSendError::NetworkMismatch);
            }
            Err(e) => {
                warn!("Failed to read form auto-send settings: {}", e);
                return RunOutcome::Aborted(e.into());
            }
        }

        let candidates =
            match instances_to_auto_send(&ctx.settings, ctx.instances.as_ref(), ctx.forms.as_ref()) {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Failed to load instances to auto-send: {}", e);
                    return RunOutcome::Aborted(e.into());
                }
            };

        if candidates.is_empty() {
            debug!("No instances to auto-send");
            return RunOutcome::Skipped;
        }

        let route = match self.route() {
            Ok(route) => route,
            Err(e) => {
                warn!("Auto-send cannot start: {}", e);
                ctx.notifier.on_submission(true, &e.user_message());
                return RunOutcome::Aborted(e);
            }
        };

        info!(
            "Auto-sending {} instance(s) via {:?}",
            candidates.len(),
            route.protocol()
        );
        let dispatcher = UploadDispatcher::new(route, Arc::clone(&ctx.instances));
        let summary = self.upload_all(&dispatcher, &candidates).await;

        ctx.notifier
            .on_submission(summary.any_failure(), &summary.message());
        RunOutcome::Completed(summary)
    }

    /// Resolves the protocol for this run.
    fn route(&self) -> Result<UploadRoute, AutoSendError> {
        let ctx = &self.ctx;
        match ctx.settings.protocol {
            Protocol::GoogleSheets => {
                if !ctx.accounts.is_permission_granted() {
                    return Err(AutoSendError::PermissionDenied);
                }
                let account = ctx
                    .accounts
                    .last_selected_account_if_valid()
                    .ok_or(AutoSendError::NoAccountSelected)?;
                ctx.accounts.select_account(&account);
                Ok(UploadRoute::Spreadsheet {
                    uploader: Arc::clone(&ctx.spreadsheet_uploader),
                })
            }
            Protocol::Server => Ok(UploadRoute::Server {
                uploader: Arc::clone(&ctx.server_uploader),
                device_id: ctx.settings.device_id.clone(),
            }),
        }
    }

    async fn upload_all(&self, dispatcher: &UploadDispatcher, candidates: &[Instance]) -> UploadSummary {
        let mut summary = UploadSummary::new();

        for instance in candidates {
            match dispatcher.submit(instance).await {
                Ok(message) => {
                    let message = message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| SUCCESS_MESSAGE.to_string());
                    summary.record(
                        instance.id,
                        &instance.display_name,
                        UploadOutcome::Success(message),
                    );

                    self.delete_if_requested(instance);
                    self.ctx.analytics.log_event(
                        analytics::SUBMISSION,
                        dispatcher.route().analytics_action(),
                        &hash_form_identifier(&instance.form_id, instance.form_version.as_deref()),
                    );
                }
                Err(e) => {
                    warn!("{}", e);
                    summary.record(
                        instance.id,
                        &instance.display_name,
                        UploadOutcome::Failure(e.user_message()),
                    );
                }
            }
        }

        summary
    }

    fn delete_if_requested(&self, instance: &Instance) {
        let ctx = &self.ctx;
        let form = match ctx
            .forms
            .get_latest_by_form_id_and_version(&instance.form_id, instance.form_version.as_deref())
        {
            Ok(form) => form,
            Err(e) => {
                warn!(
                    "Keeping instance {}: failed to read its form settings: {}",
                    instance.id, e
                );
                return;
            }
        };

        if !form_should_be_auto_deleted(form.as_ref(), ctx.settings.delete_after_send) {
            return;
        }

        match ctx.instances.delete(instance.id) {
            Ok(()) => debug!("Deleted instance {} after sending", instance.id),
            Err(e) => warn!("Failed to delete instance {}: {}", instance.id, e),
        }
    }
}
