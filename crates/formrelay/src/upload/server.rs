//! Uploader for OpenRosa-compatible submission servers.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form as MultipartForm, Part};
use reqwest::{Client, StatusCode, Url};
use secrecy::ExposeSecret;

use super::error::UploadError;
use super::response::parse_openrosa_message;
use super::InstanceUploader;
use crate::config::{Credentials, ServerSettings};
use crate::model::Instance;
use crate::sanitize::redact_url;

const OPEN_ROSA_VERSION: &str = "1.0";
const SUBMISSION_PART: &str = "xml_submission_file";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Submits instances as multipart POSTs to the configured server.
pub struct OpenRosaServerUploader {
    client: Client,
    server: ServerSettings,
    credentials: Option<Credentials>,
}

impl OpenRosaServerUploader {
    pub fn new(server: ServerSettings, credentials: Option<Credentials>) -> Result<Self, UploadError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            server,
            credentials,
        })
    }

    /// Builds the multipart body: the instance XML plus every other file in
    /// the instance directory as an attachment.
    async fn build_body(&self, instance: &Instance) -> Result<MultipartForm, UploadError> {
        let xml = read_file(&instance.instance_path).await?;
        let xml_name = file_name(&instance.instance_path);
        let xml_part = Part::bytes(xml)
            .file_name(xml_name)
            .mime_str("text/xml")?;
        let mut body = MultipartForm::new().part(SUBMISSION_PART, xml_part);

        let Some(dir) = instance.instance_dir() else {
            return Ok(body);
        };

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| UploadError::ReadPayload {
                path: dir.to_path_buf(),
                source: e,
            })?;

        let mut attachments = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| UploadError::ReadPayload {
            path: dir.to_path_buf(),
            source: e,
        })? {
            let path = entry.path();
            let name = file_name(&path);
            if path == instance.instance_path || name.starts_with('.') || !path.is_file() {
                continue;
            }
            attachments.push(path);
        }
        attachments.sort();

        for path in attachments {
            let name = file_name(&path);
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            debug!("Attaching {} ({})", name, mime);
            let part = Part::bytes(read_file(&path).await?)
                .file_name(name.clone())
                .mime_str(mime.as_ref())?;
            body = body.part(name, part);
        }

        Ok(body)
    }
}

#[async_trait]
impl InstanceUploader for OpenRosaServerUploader {
    fn destination_url(
        &self,
        instance: &Instance,
        device_id: Option<&str>,
    ) -> Result<String, UploadError> {
        let base = instance
            .submission_uri
            .clone()
            .unwrap_or_else(|| self.server.submission_url());

        let mut url = Url::parse(&base).map_err(|e| UploadError::InvalidUrl {
            url: redact_url(&base),
            reason: e.to_string(),
        })?;

        if let Some(device_id) = device_id {
            url.query_pairs_mut().append_pair("deviceID", device_id);
        }

        Ok(url.to_string())
    }

    async fn upload_one(&self, instance: &Instance, url: &str) -> Result<Option<String>, UploadError> {
        let body = self.build_body(instance).await?;

        let mut request = self
            .client
            .post(url)
            .header("X-OpenRosa-Version", OPEN_ROSA_VERSION)
            .multipart(body);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(creds.password.expose_secret()));
        }

        let response = request.send().await?;
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Failed to read response body from {}: {}",
                    redact_url(url),
                    e
                );
                String::new()
            }
        };

        match status {
            StatusCode::CREATED | StatusCode::ACCEPTED => Ok(parse_openrosa_message(&text)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let host = Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_default();
                Err(UploadError::AuthRequired { host })
            }
            _ => {
                warn!(
                    "Submission to {} rejected with status {}",
                    redact_url(url),
                    status
                );
                Err(UploadError::Rejected {
                    status: status.as_u16(),
                    message: parse_openrosa_message(&text).unwrap_or_default(),
                })
            }
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, UploadError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| UploadError::ReadPayload {
            path: path.to_path_buf(),
            source: e,
        })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "submission.xml".to_string())
}
