//! Readiness of the durable storage holding forms and instances.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Storage readiness as seen by background work.
pub trait StorageState: Send + Sync {
    /// True while files are being moved to a new storage location.
    fn is_migration_in_progress(&self) -> bool;

    /// True when the storage root is mounted and usable.
    fn is_mounted(&self) -> bool;
}

/// Storage rooted at a directory on the local filesystem.
#[derive(Debug)]
pub struct FsStorage {
    root: PathBuf,
    migrating: AtomicBool,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            migrating: AtomicBool::new(false),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Marks the start or end of a storage migration.
    pub fn set_migrating(&self, migrating: bool) {
        self.migrating.store(migrating, Ordering::Release);
    }
}

impl StorageState for FsStorage {
    fn is_migration_in_progress(&self) -> bool {
        self.migrating.load(Ordering::Acquire)
    }

    fn is_mounted(&self) -> bool {
        match std::fs::metadata(&self.root) {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }
}
