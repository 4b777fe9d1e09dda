use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::secrets::{resolve_secret_optional, SecretError};
use secrecy::SecretString;

/// Per-project settings threaded through every operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub auto_send: AutoSendMode,
    #[serde(default)]
    pub delete_after_send: bool,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub spreadsheet: SpreadsheetSettings,
    /// Device identifier attached to server submissions.
    #[serde(default)]
    pub device_id: Option<String>,
}

impl Settings {
    /// Whether auto-send is switched on at the app level.
    pub fn is_auto_send_enabled(&self) -> bool {
        self.auto_send != AutoSendMode::Off
    }
}

/// Which connection types trigger an automatic upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSendMode {
    #[default]
    Off,
    WifiOnly,
    CellularOnly,
    WifiAndCellular,
}

/// Submission transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// OpenRosa-compatible HTTP server.
    #[default]
    #[serde(alias = "odk_default")]
    Server,
    /// Rows appended to a spreadsheet.
    GoogleSheets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default = "default_submission_path")]
    pub submission_path: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_file: Option<PathBuf>,
    #[serde(default)]
    pub password_env_var: Option<String>,
}

fn default_server_url() -> String {
    "https://demo.getodk.org".to_string()
}

fn default_submission_path() -> String {
    "/submission".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            submission_path: default_submission_path(),
            username: None,
            password: None,
            password_file: None,
            password_env_var: None,
        }
    }
}

/// Basic-auth credentials for the submission server.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl ServerSettings {
    /// Resolves stored web credentials. `None` when no username is set.
    pub fn credentials(&self) -> Result<Option<Credentials>, SecretError> {
        let Some(username) = self.username.as_ref().filter(|u| !u.is_empty()) else {
            return Ok(None);
        };

        let password_file = self
            .password_file
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());
        let password = resolve_secret_optional(
            self.password.as_deref(),
            password_file.as_deref(),
            self.password_env_var.as_deref(),
        )?
        .unwrap_or_else(|| SecretString::from(String::new()));

        Ok(Some(Credentials {
            username: username.clone(),
            password,
        }))
    }

    /// Default submission endpoint: server URL joined with the submission path.
    pub fn submission_url(&self) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            self.submission_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetSettings {
    /// Default spreadsheet when an instance carries no submission URI.
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.auto_send, AutoSendMode::Off);
        assert!(!settings.is_auto_send_enabled());
        assert!(!settings.delete_after_send);
        assert_eq!(settings.protocol, Protocol::Server);
        assert_eq!(settings.server.submission_url(), "https://demo.getodk.org/submission");
    }

    #[test]
    fn test_auto_send_modes_parse() {
        for (raw, mode) in [
            ("\"off\"", AutoSendMode::Off),
            ("\"wifi_only\"", AutoSendMode::WifiOnly),
            ("\"cellular_only\"", AutoSendMode::CellularOnly),
            ("\"wifi_and_cellular\"", AutoSendMode::WifiAndCellular),
        ] {
            assert_eq!(serde_json::from_str::<AutoSendMode>(raw).unwrap(), mode);
        }
    }

    #[test]
    fn test_protocol_accepts_legacy_name() {
        assert_eq!(
            serde_json::from_str::<Protocol>("\"odk_default\"").unwrap(),
            Protocol::Server
        );
        assert_eq!(
            serde_json::from_str::<Protocol>("\"google_sheets\"").unwrap(),
            Protocol::GoogleSheets
        );
    }

    #[test]
    fn test_credentials() {
        let mut server = ServerSettings::default();
        assert!(server.credentials().unwrap().is_none());

        server.username = Some("enumerator".to_string());
        server.password = Some("secret".to_string());
        let creds = server.credentials().unwrap().unwrap();
        assert_eq!(creds.username, "enumerator");
        assert_eq!(creds.password.expose_secret(), "secret");
    }

    #[test]
    fn test_submission_url_joins_slashes() {
        let server = ServerSettings {
            url: "https://odk.example.org/v1/key/abc/".to_string(),
            submission_path: "submission".to_string(),
            ..ServerSettings::default()
        };
        assert_eq!(
            server.submission_url(),
            "https://odk.example.org/v1/key/abc/submission"
        );
    }
}
