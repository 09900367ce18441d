//! Reqwest-backed email provider relay.
//!
//! Posts the validated message as JSON to a single provider endpoint and
//! decodes the `{id, status}` acknowledgement.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

use super::relay::{AccessKey, RelayBuildError, build_client, status_message, transport_message};
use crate::domain::email::EmailMessage;
use crate::domain::ports::{EmailReceipt, EmailSendError, EmailSender};

/// Email adapter performing one HTTP POST per message.
pub struct HttpEmailRelay {
    client: Client,
    endpoint: Url,
    access_key: Option<AccessKey>,
}

impl HttpEmailRelay {
    /// Build a relay with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        access_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RelayBuildError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
            access_key: AccessKey::new(access_key),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailRelay {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailSendError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(message);
        if let Some(key) = &self.access_key {
            request = request.bearer_auth(key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|error| EmailSendError::transport(transport_message(&error)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| EmailSendError::transport(transport_message(&error)))?;
        if status.is_client_error() {
            return Err(EmailSendError::rejected(status_message(status, &body)));
        }
        if !status.is_success() {
            return Err(EmailSendError::transport(status_message(status, &body)));
        }
        decode_receipt(&body)
    }
}

fn decode_receipt(body: &[u8]) -> Result<EmailReceipt, EmailSendError> {
    serde_json::from_slice(body)
        .map_err(|error| EmailSendError::transport(format!("invalid receipt: {error}")))
}
