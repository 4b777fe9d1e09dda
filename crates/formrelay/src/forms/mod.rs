//! Form download, open and resume.

pub mod download;
pub mod error;
pub mod lifecycle;

pub use download::{DownloadEvent, DownloadProgress, FormDownloader, LogProgress, NoopProgress};
pub use error::{DownloadError, LaunchError, LifecycleError};
pub use lifecycle::{FormCacheState, FormLauncher, FormLifecycleHandler, JumpTarget, OpenedForm};
