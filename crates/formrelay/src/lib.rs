pub mod accounts;
pub mod analytics;
pub mod autosend;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod model;
pub mod network;
pub mod notify;
pub mod sanitize;
pub mod secrets;
pub mod storage;
pub mod store;
pub mod telemetry;
pub mod upload;

pub use autosend::{AutoSendContext, AutoSendError, AutoSendScheduler, AutoSendTask, RunOutcome};
pub use config::{load_settings, AutoSendMode, Protocol, Settings};
pub use error::{ConfigError, FormRelayError, Result};
pub use forms::{FormLifecycleHandler, LifecycleError, OpenedForm};
pub use model::{Form, Instance, InstanceStatus};
pub use network::{network_type_matches, NetworkStateProvider, NetworkType};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use store::{FormStore, InstanceStore, SqliteFormStore, SqliteInstanceStore, StoreError};
pub use upload::{InstanceUploader, UploadError, UploadSummary};
