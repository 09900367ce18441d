//! Reqwest-backed notification hub relay.
//!
//! Posts shaped payloads to `{endpoint}/{hub}/messages`. The target travels
//! in headers: `x-device-handle` for direct sends, `x-notification-tags` for
//! tag sends, neither for broadcasts.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};

use super::relay::{
    AccessKey, RelayBuildError, append_segments, build_client, status_message, transport_message,
};
use crate::domain::notification::NotificationPayload;
use crate::domain::ports::{NotificationReceipt, NotificationSendError, NotificationSender};

/// Header naming the payload format.
pub const FORMAT_HEADER: &str = "x-notification-format";
/// Header carrying a single device handle.
pub const DEVICE_HANDLE_HEADER: &str = "x-device-handle";
/// Header carrying the tag expression.
pub const TAGS_HEADER: &str = "x-notification-tags";

const TAG_SEPARATOR: &str = " || ";

enum Target<'a> {
    Device(&'a str),
    Tags(&'a [String]),
}

/// Notification adapter posting to a hub's message endpoint.
pub struct HttpNotificationRelay {
    client: Client,
    messages_url: Url,
    access_key: Option<AccessKey>,
}

impl HttpNotificationRelay {
    /// Build a relay for `hub` under `endpoint`.
    ///
    /// # Errors
    /// Returns an error when the client cannot be built or the endpoint
    /// cannot carry a path.
    pub fn new(
        endpoint: Url,
        hub: Option<&str>,
        access_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RelayBuildError> {
        let hub = hub.map(str::trim).filter(|hub| !hub.is_empty());
        Ok(Self {
            client: build_client(timeout)?,
            messages_url: append_segments(endpoint, hub.into_iter().chain(["messages"]))?,
            access_key: AccessKey::new(access_key),
        })
    }

    /// Resolved message endpoint.
    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }

    fn request(&self, payload: &NotificationPayload, target: Target<'_>) -> RequestBuilder {
        let mut request = self
            .client
            .post(self.messages_url.clone())
            .header(CONTENT_TYPE, payload.content_type)
            .header(FORMAT_HEADER, payload.format.as_str())
            .body(payload.body.clone());
        for (name, value) in &payload.headers {
            request = request.header(*name, value.as_str());
        }
        request = match target {
            Target::Device(handle) => request.header(DEVICE_HANDLE_HEADER, handle),
            Target::Tags([]) => request,
            Target::Tags(tags) => request.header(TAGS_HEADER, tags.join(TAG_SEPARATOR)),
        };
        match &self.access_key {
            Some(key) => request.bearer_auth(key.as_str()),
            None => request,
        }
    }

    async fn dispatch(
        &self,
        payload: &NotificationPayload,
        target: Target<'_>,
    ) -> Result<NotificationReceipt, NotificationSendError> {
        let response = self
            .request(payload, target)
            .send()
            .await
            .map_err(|error| NotificationSendError::transport(transport_message(&error)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| NotificationSendError::transport(transport_message(&error)))?;
        if status.is_client_error() {
            return Err(NotificationSendError::rejected(status_message(status, &body)));
        }
        if !status.is_success() {
            return Err(NotificationSendError::transport(status_message(status, &body)));
        }
        decode_receipt(&body)
    }
}

fn decode_receipt(body: &[u8]) -> Result<NotificationReceipt, NotificationSendError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NotificationReceipt {
            notification_id: None,
            state: None,
            tracking_id: None,
        });
    }
    serde_json::from_slice(body)
        .map_err(|error| NotificationSendError::transport(format!("invalid receipt: {error}")))
}

#[async_trait]
impl NotificationSender for HttpNotificationRelay {
    async fn send_to_device(
        &self,
        payload: &NotificationPayload,
        device_handle: &str,
    ) -> Result<NotificationReceipt, NotificationSendError> {
        self.dispatch(payload, Target::Device(device_handle)).await
    }

    async fn send_to_tags(
        &self,
        payload: &NotificationPayload,
        tags: &[String],
    ) -> Result<NotificationReceipt, NotificationSendError> {
        self.dispatch(payload, Target::Tags(tags)).await
    }
}
