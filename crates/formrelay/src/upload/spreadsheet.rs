//! Uploader that appends instances as rows of a spreadsheet.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::json;

use super::error::UploadError;
use super::response::leaf_values;
use super::InstanceUploader;
use crate::accounts::AccountAccess;
use crate::config::SpreadsheetSettings;
use crate::model::Instance;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn spreadsheet_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://docs\.google\.com/spreadsheets/d/([A-Za-z0-9_-]+)")
            .expect("spreadsheet url pattern is valid")
    })
}

/// Whether `url` refers to a spreadsheet file (as opposed to a folder,
/// a form, or any other document).
pub fn is_spreadsheet_url(url: &str) -> bool {
    spreadsheet_url_pattern().is_match(url)
}

/// Extracts the spreadsheet id from a spreadsheet URL.
pub fn spreadsheet_id(url: &str) -> Option<&str> {
    spreadsheet_url_pattern()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Appends one row per instance using the selected account's token.
pub struct SpreadsheetUploader {
    client: Client,
    settings: SpreadsheetSettings,
    accounts: Arc<dyn AccountAccess>,
}

impl SpreadsheetUploader {
    pub fn new(
        settings: SpreadsheetSettings,
        accounts: Arc<dyn AccountAccess>,
    ) -> Result<Self, UploadError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            settings,
            accounts,
        })
    }
}

#[async_trait]
impl InstanceUploader for SpreadsheetUploader {
    fn destination_url(
        &self,
        instance: &Instance,
        _device_id: Option<&str>,
    ) -> Result<String, UploadError> {
        instance
            .submission_uri
            .clone()
            .or_else(|| self.settings.url.clone())
            .ok_or(UploadError::NoDestination {
                instance_id: instance.id,
            })
    }

    async fn upload_one(&self, instance: &Instance, url: &str) -> Result<Option<String>, UploadError> {
        let sheet_id = spreadsheet_id(url).ok_or_else(|| UploadError::InvalidUrl {
            url: url.to_string(),
            reason: "not a spreadsheet url".to_string(),
        })?;

        let xml = tokio::fs::read_to_string(&instance.instance_path)
            .await
            .map_err(|e| UploadError::ReadPayload {
                path: instance.instance_path.clone(),
                source: e,
            })?;
        let row: Vec<String> = leaf_values(&xml)?.into_iter().map(|(_, v)| v).collect();

        let token = self.accounts.access_token().await?;
        let endpoint = format!("{}/{}/values/A1:append", SHEETS_API, sheet_id);
        debug!("Appending {} cells to spreadsheet {}", row.len(), sheet_id);

        let response = self
            .client
            .post(&endpoint)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token.expose_secret())
            .json(&json!({ "values": [row] }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(None);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read spreadsheet error response: {}", e);
                String::new()
            }
        };
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_default();
        Err(UploadError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountError;
    use crate::model::InstanceStatus;
    use secrecy::SecretString;
    use std::path::PathBuf;

    struct NoAccounts;

    #[async_trait]
    impl AccountAccess for NoAccounts {
        fn is_permission_granted(&self) -> bool {
            false
        }
        fn last_selected_account_if_valid(&self) -> Option<String> {
            None
        }
        fn select_account(&self, _account: &str) {}
        fn selected_account(&self) -> Option<String> {
            None
        }
        async fn access_token(&self) -> Result<SecretString, AccountError> {
            Err(AccountError::NoAccountSelected)
        }
    }

    fn uploader(url: Option<&str>) -> SpreadsheetUploader {
        SpreadsheetUploader::new(
            SpreadsheetSettings {
                url: url.map(str::to_string),
            },
            Arc::new(NoAccounts),
        )
        .unwrap()
    }

    fn instance() -> Instance {
        Instance::new(
            "household",
            None,
            PathBuf::from("/data/instances/h/h.xml"),
            InstanceStatus::Complete,
        )
    }

    #[test]
    fn test_is_spreadsheet_url() {
        assert!(is_spreadsheet_url(
            "https://docs.google.com/spreadsheets/d/1AbC-d_E/edit#gid=0"
        ));
        assert!(!is_spreadsheet_url("https://drive.google.com/drive/folders/1AbC"));
        assert!(!is_spreadsheet_url("https://docs.google.com/forms/d/1AbC"));
        assert!(!is_spreadsheet_url("https://odk.example.org/submission"));
    }

    #[test]
    fn test_spreadsheet_id() {
        assert_eq!(
            spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbC-d_E/edit"),
            Some("1AbC-d_E")
        );
        assert_eq!(spreadsheet_id("https://example.org"), None);
    }

    #[test]
    fn test_destination_prefers_instance_uri() {
        let instance = instance().with_submission_uri("https://docs.google.com/spreadsheets/d/X");
        let url = uploader(Some("https://docs.google.com/spreadsheets/d/Y"))
            .destination_url(&instance, Some("ignored"))
            .unwrap();
        assert_eq!(url, "https://docs.google.com/spreadsheets/d/X");
    }

    #[test]
    fn test_destination_without_any_url() {
        let err = uploader(None).destination_url(&instance(), None).unwrap_err();
        assert!(matches!(err, UploadError::NoDestination { .. }));
    }

    #[tokio::test]
    async fn test_upload_refuses_non_spreadsheet_url() {
        let err = uploader(None)
            .upload_one(&instance(), "https://odk.example.org/submission")
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_upload_surfaces_account_errors() {
        let dir = tempfile::tempdir().unwrap();
        let xml = dir.path().join("h.xml");
        std::fs::write(&xml, "<data><name>Ada</name></data>").unwrap();
        let mut instance = instance();
        instance.instance_path = xml;

        let err = uploader(None)
            .upload_one(&instance, "https://docs.google.com/spreadsheets/d/X")
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Account(AccountError::NoAccountSelected)));
    }
}
