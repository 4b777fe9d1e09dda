use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A downloaded form definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// Database identifier. Zero until the form has been stored.
    pub id: i64,
    pub form_id: String,
    pub version: Option<String>,
    pub display_name: String,
    pub form_file_path: PathBuf,
    pub form_media_path: Option<PathBuf>,
    /// Form-level auto-send override. `None` defers to the app setting.
    pub auto_send: Option<bool>,
    /// Form-level delete-after-send override. `None` defers to the app setting.
    pub auto_delete: Option<bool>,
    pub date_added: DateTime<Utc>,
}

impl Form {
    pub fn new(
        form_id: impl Into<String>,
        version: Option<String>,
        form_file_path: PathBuf,
    ) -> Self {
        let form_id = form_id.into();
        Self {
            id: 0,
            display_name: form_id.clone(),
            form_id,
            version,
            form_file_path,
            form_media_path: None,
            auto_send: None,
            auto_delete: None,
            date_added: Utc::now(),
        }
    }

    pub fn with_auto_send(mut self, auto_send: Option<bool>) -> Self {
        self.auto_send = auto_send;
        self
    }

    pub fn with_auto_delete(mut self, auto_delete: Option<bool>) -> Self {
        self.auto_delete = auto_delete;
        self
    }

    /// True when the form explicitly opts into auto-send.
    pub fn requests_auto_send(&self) -> bool {
        self.auto_send == Some(true)
    }

    /// Whether the definition file backing this record is on disk.
    pub fn definition_exists(&self) -> bool {
        self.form_file_path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_auto_send_is_tri_state() {
        let form = Form::new("f", None, PathBuf::from("/forms/f.xml"));
        assert!(!form.requests_auto_send());
        assert!(!form.clone().with_auto_send(Some(false)).requests_auto_send());
        assert!(form.with_auto_send(Some(true)).requests_auto_send());
    }

    #[test]
    fn test_definition_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.xml");
        let form = Form::new("f", None, path.clone());
        assert!(!form.definition_exists());

        std::fs::write(&path, "<h:html/>").unwrap();
        assert!(form.definition_exists());
    }
}
