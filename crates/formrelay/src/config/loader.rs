use std::path::Path;

use crate::config::schema::{Protocol, Settings};
use crate::error::ConfigError;
use crate::upload::spreadsheet::is_spreadsheet_url;

const SCHEMA_JSON: &str = include_str!("../../../../schema/settings-v1.json");

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_settings_from_str(&content)
}

pub fn load_settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let settings: Settings = serde_json::from_value(json_value)?;

    validate_settings(&settings)?;

    Ok(settings)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    reqwest::Url::parse(&settings.server.url).map_err(|e| ConfigError::Validation {
        message: format!("Invalid server url '{}': {}", settings.server.url, e),
    })?;

    if settings.protocol == Protocol::GoogleSheets {
        match &settings.spreadsheet.url {
            None => {
                return Err(ConfigError::Validation {
                    message: "spreadsheet url is required for the google_sheets protocol"
                        .to_string(),
                });
            }
            Some(url) if !is_spreadsheet_url(url) => {
                return Err(ConfigError::Validation {
                    message: format!("'{}' is not a spreadsheet url", url),
                });
            }
            Some(_) => {}
        }
    }

    // Password sources must resolve at load time.
    settings.server.credentials()?;

    Ok(())
}
