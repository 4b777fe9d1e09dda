//! Selection of the instances an auto-send run should upload.

use std::collections::HashMap;

use crate::config::Settings;
use crate::model::{Form, Instance, InstanceStatus};
use crate::store::{FormStore, InstanceStore, StoreError};

/// Returns the finalized instances to upload, in store order.
///
/// With app-level auto-send on every finalized instance qualifies. With it
/// off, only instances whose exact form version opts into auto-send do.
pub fn instances_to_auto_send(
    settings: &Settings,
    instances: &dyn InstanceStore,
    forms: &dyn FormStore,
) -> Result<Vec<Instance>, StoreError> {
    let finalized = instances.get_all_by_status(&InstanceStatus::FINALIZED)?;

    if settings.is_auto_send_enabled() {
        return Ok(finalized);
    }

    let mut opted_in: HashMap<(String, Option<String>), bool> = HashMap::new();
    let mut selected = Vec::with_capacity(finalized.len());

    for instance in finalized {
        let key = (instance.form_id.clone(), instance.form_version.clone());
        let requests = match opted_in.get(&key) {
            Some(requests) => *requests,
            None => {
                let requests = forms
                    .get_latest_by_form_id_and_version(&key.0, key.1.as_deref())?
                    .is_some_and(|form| form.requests_auto_send());
                opted_in.insert(key, requests);
                requests
            }
        };

        if requests {
            selected.push(instance);
        }
    }

    Ok(selected)
}

/// True when any form on the device opts into auto-send.
pub fn at_least_one_form_specifies_auto_send(forms: &dyn FormStore) -> Result<bool, StoreError> {
    forms.any_requests_auto_send()
}

/// The form's delete-after-send override, or the app setting when the form
/// has none (or is unknown).
pub fn form_should_be_auto_deleted(form: Option<&Form>, delete_after_send: bool) -> bool {
    form.and_then(|f| f.auto_delete).unwrap_or(delete_after_send)
}
