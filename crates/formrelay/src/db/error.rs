//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::InstanceStatus;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error when creating directories or files.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// An instance status change that would move the instance backwards.
    #[error("Instance {id} cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        id: i64,
        from: InstanceStatus,
        to: InstanceStatus,
    },

    /// The referenced record does not exist.
    #[error("No {table} record with id {id}")]
    NotFound { table: &'static str, id: i64 },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,
}
