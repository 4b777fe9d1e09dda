//! SQLite-backed stores.

use std::path::Path;

use chrono::Utc;
use log::{debug, warn};

use super::{FormStore, InstanceStore, StoreError};
use crate::db::{form_repo, instance_repo, Database};
use crate::model::{Form, Instance, InstanceStatus};

/// Instance store over the `instances` table.
#[derive(Clone)]
pub struct SqliteInstanceStore {
    db: Database,
}

impl SqliteInstanceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl InstanceStore for SqliteInstanceStore {
    fn get_all_by_status(&self, statuses: &[InstanceStatus]) -> Result<Vec<Instance>, StoreError> {
        Ok(instance_repo::find_by_statuses(&self.db, statuses)?)
    }

    fn get_all_by_form_id(&self, form_id: &str) -> Result<Vec<Instance>, StoreError> {
        Ok(instance_repo::find_by_form_id(&self.db, form_id)?)
    }

    fn get(&self, id: i64) -> Result<Option<Instance>, StoreError> {
        Ok(instance_repo::find_by_id(&self.db, id)?)
    }

    fn insert(&self, instance: &Instance) -> Result<i64, StoreError> {
        Ok(instance_repo::insert(&self.db, instance)?)
    }

    fn update_status(&self, id: i64, status: InstanceStatus) -> Result<(), StoreError> {
        Ok(instance_repo::update_status(&self.db, id, status, Utc::now())?)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let Some(instance) = instance_repo::find_by_id(&self.db, id)? else {
            debug!("Instance {} already gone", id);
            return Ok(());
        };

        instance_repo::delete(&self.db, id)?;

        // Payload and attachments share one directory per instance.
        if let Some(dir) = instance.instance_dir() {
            remove_dir_best_effort(dir);
        }
        Ok(())
    }
}

/// Form store over the `forms` table.
#[derive(Clone)]
pub struct SqliteFormStore {
    db: Database,
}

impl SqliteFormStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl FormStore for SqliteFormStore {
    fn get_latest_by_form_id_and_version(
        &self,
        form_id: &str,
        version: Option<&str>,
    ) -> Result<Option<Form>, StoreError> {
        Ok(form_repo::find_latest_by_form_id_and_version(
            &self.db, form_id, version,
        )?)
    }

    fn get_latest_by_form_id(&self, form_id: &str) -> Result<Option<Form>, StoreError> {
        Ok(form_repo::find_latest_by_form_id(&self.db, form_id)?)
    }

    fn get_all(&self) -> Result<Vec<Form>, StoreError> {
        Ok(form_repo::find_all(&self.db)?)
    }

    fn any_requests_auto_send(&self) -> Result<bool, StoreError> {
        Ok(form_repo::any_auto_send(&self.db)?)
    }

    fn insert(&self, form: &Form) -> Result<i64, StoreError> {
        Ok(form_repo::insert(&self.db, form)?)
    }

    fn delete_by_form_id(&self, form_id: &str) -> Result<u64, StoreError> {
        Ok(form_repo::delete_by_form_id(&self.db, form_id)?)
    }
}

fn remove_dir_best_effort(dir: &Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dir) {
        warn!("Failed to remove instance directory {}: {}", dir.display(), e);
    }
}
