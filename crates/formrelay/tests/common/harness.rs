//! Isolated environment for running the auto-send task and the lifecycle
//! handler against a real in-memory store.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use formrelay::autosend::{AutoSendContext, AutoSendTask};
use formrelay::config::Settings;
use formrelay::db::Database;
use formrelay::forms::{FormLifecycleHandler, NoopProgress};
use formrelay::model::{Form, Instance, InstanceStatus};
use formrelay::network::{NetworkType, SharedNetworkState};
use formrelay::storage::FsStorage;
use formrelay::store::{FormStore, InstanceStore, SqliteFormStore, SqliteInstanceStore};

use super::builders::{SERVER_URL, SHEET_URL};
use super::fakes::{
    FakeAccounts, FakeDownloader, RecordingAnalytics, RecordingLauncher, RecordingNotifier,
    RecordingUploader,
};

pub struct TestHarness {
    pub dir: TempDir,
    pub instances: Arc<SqliteInstanceStore>,
    pub forms: Arc<SqliteFormStore>,
    pub storage: Arc<FsStorage>,
    pub network: Arc<SharedNetworkState>,
    pub accounts: Arc<FakeAccounts>,
    pub server: Arc<RecordingUploader>,
    pub sheets: Arc<RecordingUploader>,
    pub notifier: Arc<RecordingNotifier>,
    pub analytics: Arc<RecordingAnalytics>,
    pub launcher: Arc<RecordingLauncher>,
}

impl TestHarness {
    /// Mounted storage, wifi connection, signed-in account.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let db = Database::open_in_memory().expect("open database");
        let storage = Arc::new(FsStorage::new(dir.path()));

        Self {
            instances: Arc::new(SqliteInstanceStore::new(db.clone())),
            forms: Arc::new(SqliteFormStore::new(db)),
            storage,
            network: Arc::new(SharedNetworkState::new(Some(NetworkType::Wifi))),
            accounts: Arc::new(FakeAccounts::signed_in("collector@example.org")),
            server: Arc::new(RecordingUploader::new(SERVER_URL)),
            sheets: Arc::new(RecordingUploader::new(SHEET_URL)),
            notifier: Arc::new(RecordingNotifier::default()),
            analytics: Arc::new(RecordingAnalytics::default()),
            launcher: Arc::new(RecordingLauncher::default()),
            dir,
        }
    }

    pub fn with_accounts(mut self, accounts: FakeAccounts) -> Self {
        self.accounts = Arc::new(accounts);
        self
    }

    pub fn with_server(mut self, uploader: RecordingUploader) -> Self {
        self.server = Arc::new(uploader);
        self
    }

    pub fn with_sheets(mut self, uploader: RecordingUploader) -> Self {
        self.sheets = Arc::new(uploader);
        self
    }

    pub fn with_unmounted_storage(mut self) -> Self {
        self.storage = Arc::new(FsStorage::new(self.dir.path().join("unmounted")));
        self
    }

    /// Stores a form whose definition file exists on disk.
    pub fn add_form(&self, form_id: &str, version: Option<&str>, auto_send: Option<bool>) -> Form {
        let path = self.forms_dir().join(format!("{form_id}.xml"));
        std::fs::write(&path, "<h:html/>").expect("write form definition");

        let mut form =
            Form::new(form_id, version.map(str::to_string), path).with_auto_send(auto_send);
        form.id = self.forms.insert(&form).expect("insert form");
        form
    }

    /// Stores an instance with a payload file in its own directory.
    pub fn add_instance(
        &self,
        form_id: &str,
        version: Option<&str>,
        status: InstanceStatus,
        name: &str,
    ) -> Instance {
        let dir = self.dir.path().join("instances").join(name);
        std::fs::create_dir_all(&dir).expect("create instance dir");
        let path = dir.join(format!("{name}.xml"));
        std::fs::write(&path, "<data><name>Ada</name></data>").expect("write payload");

        let instance = Instance::new(form_id, version.map(str::to_string), path, status)
            .with_display_name(name);
        self.insert_instance(instance)
    }

    /// Stores a prepared instance and returns it with its id set.
    pub fn insert_instance(&self, mut instance: Instance) -> Instance {
        instance.id = self.instances.insert(&instance).expect("insert instance");
        instance
    }

    pub fn status_of(&self, id: i64) -> Option<InstanceStatus> {
        self.instances
            .get(id)
            .expect("read instance")
            .map(|i| i.status)
    }

    pub fn task(&self, settings: Settings) -> AutoSendTask {
        AutoSendTask::new(AutoSendContext {
            settings,
            storage: self.storage.clone(),
            network: self.network.clone(),
            instances: self.instances.clone(),
            forms: self.forms.clone(),
            accounts: self.accounts.clone(),
            server_uploader: self.server.clone(),
            spreadsheet_uploader: self.sheets.clone(),
            notifier: self.notifier.clone(),
            analytics: self.analytics.clone(),
        })
    }

    pub fn downloader(&self) -> FakeDownloader {
        FakeDownloader::new(self.forms.clone(), self.forms_dir())
    }

    pub fn lifecycle(&self, downloader: Arc<FakeDownloader>) -> FormLifecycleHandler {
        FormLifecycleHandler::new(
            self.instances.clone(),
            self.forms.clone(),
            downloader,
            self.launcher.clone(),
            Arc::new(NoopProgress),
        )
    }

    fn forms_dir(&self) -> PathBuf {
        let dir = self.dir.path().join("forms");
        std::fs::create_dir_all(&dir).expect("create forms dir");
        dir
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
