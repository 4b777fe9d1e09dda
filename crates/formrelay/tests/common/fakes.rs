//! In-memory stand-ins for the host capabilities.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use formrelay::accounts::{AccountAccess, AccountError};
use formrelay::analytics::Analytics;
use formrelay::forms::{
    DownloadError, DownloadProgress, FormDownloader, FormLauncher, JumpTarget, LaunchError,
};
use formrelay::model::{Form, Instance};
use formrelay::notify::Notifier;
use formrelay::store::FormStore;
use formrelay::upload::{InstanceUploader, UploadError};

/// Scripted response of [`RecordingUploader`] for one form id.
#[derive(Debug, Clone)]
pub enum Reply {
    Accept(Option<String>),
    Reject(u16, String),
}

/// Uploader that records every call and answers from a script.
pub struct RecordingUploader {
    default_url: String,
    replies: Mutex<HashMap<String, Reply>>,
    pub uploads: Mutex<Vec<(i64, String)>>,
}

impl RecordingUploader {
    pub fn new(default_url: &str) -> Self {
        Self {
            default_url: default_url.to_string(),
            replies: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, form_id: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(form_id.to_string(), reply);
        self
    }

    pub fn uploaded_ids(&self) -> Vec<i64> {
        self.uploads.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

#[async_trait]
impl InstanceUploader for RecordingUploader {
    fn destination_url(
        &self,
        instance: &Instance,
        device_id: Option<&str>,
    ) -> Result<String, UploadError> {
        let base = instance
            .submission_uri
            .clone()
            .unwrap_or_else(|| self.default_url.clone());
        Ok(match device_id {
            Some(id) => format!("{base}?deviceID={id}"),
            None => base,
        })
    }

    async fn upload_one(&self, instance: &Instance, url: &str) -> Result<Option<String>, UploadError> {
        self.uploads
            .lock()
            .unwrap()
            .push((instance.id, url.to_string()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&instance.form_id)
            .cloned()
            .unwrap_or(Reply::Accept(None));

        match reply {
            Reply::Accept(message) => Ok(message),
            Reply::Reject(status, message) => Err(UploadError::Rejected { status, message }),
        }
    }
}

/// Account capability with fixed answers.
pub struct FakeAccounts {
    pub permission_granted: bool,
    pub last_selected: Option<String>,
    pub selected: Mutex<Option<String>>,
}

impl FakeAccounts {
    pub fn signed_in(account: &str) -> Self {
        Self {
            permission_granted: true,
            last_selected: Some(account.to_string()),
            selected: Mutex::new(None),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission_granted: false,
            last_selected: None,
            selected: Mutex::new(None),
        }
    }

    pub fn without_account() -> Self {
        Self {
            permission_granted: true,
            last_selected: None,
            selected: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AccountAccess for FakeAccounts {
    fn is_permission_granted(&self) -> bool {
        self.permission_granted
    }

    fn last_selected_account_if_valid(&self) -> Option<String> {
        self.last_selected.clone()
    }

    fn select_account(&self, account: &str) {
        *self.selected.lock().unwrap() = Some(account.to_string());
    }

    fn selected_account(&self) -> Option<String> {
        self.selected.lock().unwrap().clone()
    }

    async fn access_token(&self) -> Result<SecretString, AccountError> {
        Ok(SecretString::from("token".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<(bool, String)>>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<(bool, String)> {
        self.notices.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn on_submission(&self, any_failure: bool, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((any_failure, message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingAnalytics {
    pub events: Mutex<Vec<(String, String, String)>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<(String, String, String)> {
        self.events.lock().unwrap().clone()
    }
}

impl Analytics for RecordingAnalytics {
    fn log_event(&self, category: &str, action: &str, label: &str) {
        self.events.lock().unwrap().push((
            category.to_string(),
            action.to_string(),
            label.to_string(),
        ));
    }
}

/// Downloader that writes a definition file and records it in the store.
pub struct FakeDownloader {
    forms: Arc<dyn FormStore>,
    dir: PathBuf,
    fail: bool,
    pub requested: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new(forms: Arc<dyn FormStore>, dir: PathBuf) -> Self {
        Self {
            forms,
            dir,
            fail: false,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormDownloader for FakeDownloader {
    async fn download_form_by_id(
        &self,
        form_id: &str,
        _progress: &dyn DownloadProgress,
    ) -> Result<Form, DownloadError> {
        self.requested.lock().unwrap().push(form_id.to_string());
        if self.fail {
            return Err(DownloadError::Network("connection reset".to_string()));
        }

        let path = self.dir.join(format!("{form_id}.xml"));
        std::fs::write(&path, "<h:html/>").map_err(|e| DownloadError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut form = Form::new(form_id, Some("1".to_string()), path);
        form.id = self
            .forms
            .insert(&form)
            .map_err(|e| DownloadError::Network(e.to_string()))?;
        Ok(form)
    }

    async fn download_required_forms(
        &self,
        progress: &dyn DownloadProgress,
    ) -> Result<(), DownloadError> {
        self.download_form_by_id("required", progress).await.map(|_| ())
    }
}

/// What [`RecordingLauncher`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    Blank(String),
    Resume(i64, JumpTarget),
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub launches: Mutex<Vec<Launch>>,
}

impl RecordingLauncher {
    pub fn launches(&self) -> Vec<Launch> {
        self.launches.lock().unwrap().clone()
    }
}

impl FormLauncher for RecordingLauncher {
    fn open_blank(&self, form: &Form) -> Result<(), LaunchError> {
        self.launches
            .lock()
            .unwrap()
            .push(Launch::Blank(form.form_id.clone()));
        Ok(())
    }

    fn resume(&self, instance: &Instance, jump: JumpTarget) -> Result<(), LaunchError> {
        self.launches
            .lock()
            .unwrap()
            .push(Launch::Resume(instance.id, jump));
        Ok(())
    }
}
