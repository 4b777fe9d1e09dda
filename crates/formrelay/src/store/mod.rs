//! Repository contracts for forms and instances.
//!
//! The auto-send task and the lifecycle handler only see these traits.
//! [`sqlite`] provides the implementation backed by [`crate::db::Database`].

use thiserror::Error;

use crate::db::DatabaseError;
use crate::model::{Form, Instance, InstanceStatus};

pub mod sqlite;

pub use sqlite::{SqliteFormStore, SqliteInstanceStore};

/// Errors surfaced by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Access to filled-out form instances.
pub trait InstanceStore: Send + Sync {
    /// Returns every instance in one of `statuses`, in store order.
    fn get_all_by_status(&self, statuses: &[InstanceStatus]) -> Result<Vec<Instance>, StoreError>;

    fn get_all_by_form_id(&self, form_id: &str) -> Result<Vec<Instance>, StoreError>;

    fn get(&self, id: i64) -> Result<Option<Instance>, StoreError>;

    /// Stores a new instance and returns its id.
    fn insert(&self, instance: &Instance) -> Result<i64, StoreError>;

    fn update_status(&self, id: i64, status: InstanceStatus) -> Result<(), StoreError>;

    /// Removes the instance record and its payload. Deleting an unknown id
    /// is not an error.
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Access to downloaded form definitions.
pub trait FormStore: Send + Sync {
    fn get_latest_by_form_id_and_version(
        &self,
        form_id: &str,
        version: Option<&str>,
    ) -> Result<Option<Form>, StoreError>;

    fn get_latest_by_form_id(&self, form_id: &str) -> Result<Option<Form>, StoreError>;

    fn get_all(&self) -> Result<Vec<Form>, StoreError>;

    /// True when any stored form explicitly opts into auto-send.
    fn any_requests_auto_send(&self) -> Result<bool, StoreError>;

    /// Stores a new form record and returns its id.
    fn insert(&self, form: &Form) -> Result<i64, StoreError>;

    /// Removes every version of a form. Returns the number of records removed.
    fn delete_by_form_id(&self, form_id: &str) -> Result<u64, StoreError>;
}
