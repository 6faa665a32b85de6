use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use engine_logging::{engine_debug, engine_warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::transport::map_reqwest_error;
use crate::{FailureKind, FetchSettings, RemoteError};

pub const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Required variables for sending emails are missing. No emails sent.")]
    NotConfigured,
    #[error("invalid mail endpoint: {0}")]
    Endpoint(String),
    #[error("mail request failed: {0}")]
    Remote(#[from] RemoteError),
}

/// Delivers the finished report to a recipient.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(
        &self,
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<(), NotifyError>;
}

/// Used when no email settings are configured; every send fails softly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait::async_trait]
impl Notifier for DisabledNotifier {
    async fn send_email(
        &self,
        _subject: &str,
        _body: &str,
        _attachment: &Path,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailSettings {
    pub from: String,
    pub to: Vec<String>,
    pub api_key: String,
}

impl EmailSettings {
    pub fn is_complete(&self) -> bool {
        !self.from.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && self.to.iter().any(|address| !address.trim().is_empty())
    }
}

/// Sends mail through the SendGrid v3 HTTP API.
#[derive(Debug, Clone)]
pub struct SendGridNotifier {
    client: reqwest::Client,
    endpoint: Url,
    settings: EmailSettings,
}

impl SendGridNotifier {
    pub fn new(settings: EmailSettings, fetch: &FetchSettings) -> Result<Self, NotifyError> {
        Self::with_endpoint(settings, fetch, SENDGRID_ENDPOINT)
    }

    pub fn with_endpoint(
        settings: EmailSettings,
        fetch: &FetchSettings,
        endpoint: &str,
    ) -> Result<Self, NotifyError> {
        if !settings.is_complete() {
            return Err(NotifyError::NotConfigured);
        }
        let endpoint =
            Url::parse(endpoint).map_err(|err| NotifyError::Endpoint(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(fetch.connect_timeout)
            .timeout(fetch.request_timeout)
            .build()
            .map_err(|err| RemoteError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }

    fn build_message(&self, subject: &str, body: &str, attachment: &Path) -> Value {
        let to: Vec<Value> = self
            .settings
            .to
            .iter()
            .filter(|address| !address.trim().is_empty())
            .map(|address| json!({ "email": address }))
            .collect();
        // SendGrid rejects empty content values.
        let body = if body.is_empty() { " " } else { body };

        let mut message = json!({
            "personalizations": [{ "to": to }],
            "from": { "email": self.settings.from },
            "subject": subject,
            "content": [{ "type": "text/html", "value": body }],
        });

        match fs::read(attachment) {
            Ok(bytes) => {
                let filename = attachment
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "report.csv".to_string());
                message["attachments"] = json!([{
                    "content": STANDARD.encode(bytes),
                    "filename": filename,
                    "type": "text/csv",
                    "disposition": "attachment",
                }]);
            }
            Err(err) => {
                engine_warn!(
                    "Attachment {} not readable, sending without it: {}",
                    attachment.display(),
                    err
                );
            }
        }
        message
    }
}

#[async_trait::async_trait]
impl Notifier for SendGridNotifier {
    async fn send_email(
        &self,
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<(), NotifyError> {
        let message = self.build_message(subject, body, attachment);
        let payload = serde_json::to_vec(&message)
            .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let err = RemoteError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string());
            return Err(err.into());
        }
        engine_debug!("email accepted with status {}", status);
        Ok(())
    }
}
