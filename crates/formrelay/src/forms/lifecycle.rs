//! Opening and resuming forms.
//!
//! A form id is either not cached, cached with its definition file on disk,
//! or cached with the file gone. The last case is repaired by dropping the
//! stale records and downloading again before the form is opened.

use std::sync::Arc;

use log::{debug, info, warn};
use tracing::{info_span, Instrument};

use super::download::{DownloadProgress, FormDownloader};
use super::error::{LaunchError, LifecycleError};
use crate::model::{Form, Instance, InstanceStatus};
use crate::sanitize::hash_form_identifier;
use crate::store::{FormStore, InstanceStore};

/// Where a resumed instance should be positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Beginning,
    LastPosition,
}

/// Host capability that shows a form to the user.
pub trait FormLauncher: Send + Sync {
    /// Starts a new, empty instance of `form`.
    fn open_blank(&self, form: &Form) -> Result<(), LaunchError>;

    /// Reopens a saved instance for editing.
    fn resume(&self, instance: &Instance, jump: JumpTarget) -> Result<(), LaunchError>;
}

/// Cache state of a form id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCacheState {
    NotCached,
    CachedValid(Form),
    /// Record present, definition file missing.
    CachedCorrupt(Form),
}

/// What was shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenedForm {
    Blank(Form),
    Resumed(Instance),
}

pub struct FormLifecycleHandler {
    instances: Arc<dyn InstanceStore>,
    forms: Arc<dyn FormStore>,
    downloader: Arc<dyn FormDownloader>,
    launcher: Arc<dyn FormLauncher>,
    progress: Arc<dyn DownloadProgress>,
}

impl FormLifecycleHandler {
    pub fn new(
        instances: Arc<dyn InstanceStore>,
        forms: Arc<dyn FormStore>,
        downloader: Arc<dyn FormDownloader>,
        launcher: Arc<dyn FormLauncher>,
        progress: Arc<dyn DownloadProgress>,
    ) -> Self {
        Self {
            instances,
            forms,
            downloader,
            launcher,
            progress,
        }
    }

    /// Downloads every form the project needs.
    pub async fn prepare_required_forms(
        &self,
        progress: &dyn DownloadProgress,
    ) -> Result<(), LifecycleError> {
        self.downloader.download_required_forms(progress).await?;
        Ok(())
    }

    /// Opens a blank instance of `form_id`, discarding its unfinished drafts.
    pub async fn open_form(&self, form_id: &str) -> Result<OpenedForm, LifecycleError> {
        let span = info_span!("open_form", form = %hash_form_identifier(form_id, None));
        self.open_form_inner(form_id).instrument(span).await
    }

    /// Resumes the most recent draft of `form_id`, or opens a blank one.
    pub async fn open_saved_form(&self, form_id: &str) -> Result<OpenedForm, LifecycleError> {
        let span = info_span!("open_saved_form", form = %hash_form_identifier(form_id, None));
        self.open_saved_form_inner(form_id).instrument(span).await
    }

    pub fn cache_state(&self, form_id: &str) -> Result<FormCacheState, LifecycleError> {
        Ok(match self.forms.get_latest_by_form_id(form_id)? {
            None => FormCacheState::NotCached,
            Some(form) if form.definition_exists() => FormCacheState::CachedValid(form),
            Some(form) => FormCacheState::CachedCorrupt(form),
        })
    }

    async fn open_form_inner(&self, form_id: &str) -> Result<OpenedForm, LifecycleError> {
        self.discard_drafts(form_id)?;

        let form = match self.cache_state(form_id)? {
            FormCacheState::CachedValid(form) => form,
            FormCacheState::NotCached => self.download(form_id).await?,
            FormCacheState::CachedCorrupt(stale) => {
                warn!(
                    "Definition file for form {} is missing, downloading again",
                    stale.id
                );
                self.forms.delete_by_form_id(form_id)?;
                self.download(form_id).await?
            }
        };

        self.launcher.open_blank(&form)?;
        Ok(OpenedForm::Blank(form))
    }

    async fn open_saved_form_inner(&self, form_id: &str) -> Result<OpenedForm, LifecycleError> {
        if let Some(draft) = self.latest_draft(form_id)? {
            debug!("Resuming draft {}", draft.id);
            self.launcher.resume(&draft, JumpTarget::Beginning)?;
            return Ok(OpenedForm::Resumed(draft));
        }
        self.open_form_inner(form_id).await
    }

    async fn download(&self, form_id: &str) -> Result<Form, LifecycleError> {
        info!("Form not cached, downloading");
        let form = self
            .downloader
            .download_form_by_id(form_id, self.progress.as_ref())
            .await?;
        Ok(form)
    }

    fn discard_drafts(&self, form_id: &str) -> Result<(), LifecycleError> {
        let drafts = self
            .instances
            .get_all_by_form_id(form_id)?
            .into_iter()
            .filter(|i| i.status == InstanceStatus::Incomplete);

        for draft in drafts {
            debug!("Deleting abandoned draft {}", draft.id);
            self.instances.delete(draft.id)?;
        }
        Ok(())
    }

    fn latest_draft(&self, form_id: &str) -> Result<Option<Instance>, LifecycleError> {
        Ok(self
            .instances
            .get_all_by_form_id(form_id)?
            .into_iter()
            .filter(|i| i.status == InstanceStatus::Incomplete)
            .max_by(|a, b| {
                a.last_status_change
                    .cmp(&b.last_status_change)
                    .then(a.id.cmp(&b.id))
            }))
    }
}
