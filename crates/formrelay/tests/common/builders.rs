//! Builders for test settings.

#![allow(dead_code)]

use formrelay::config::{AutoSendMode, Protocol, Settings, SpreadsheetSettings};

pub const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1SheetId/edit";
pub const SERVER_URL: &str = "https://odk.example.org/submission";

/// Builder for [`Settings`].
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Auto-send off, server protocol, keep sent instances.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn auto_send(mut self, mode: AutoSendMode) -> Self {
        self.settings.auto_send = mode;
        self
    }

    pub fn delete_after_send(mut self, delete: bool) -> Self {
        self.settings.delete_after_send = delete;
        self
    }

    pub fn spreadsheet(mut self, url: &str) -> Self {
        self.settings.protocol = Protocol::GoogleSheets;
        self.settings.spreadsheet = SpreadsheetSettings {
            url: Some(url.to_string()),
        };
        self
    }

    pub fn device_id(mut self, id: &str) -> Self {
        self.settings.device_id = Some(id.to_string());
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
