//! Push notification requests, dispatch targets, and per-platform payloads.
//!
//! A [`NotificationDraft`] carries caller-supplied fields; converting it into
//! a [`NotificationRequest`] applies the presence and platform rules.
//! [`NotificationRequest::payload`] then shapes the provider body for the
//! chosen platform, or for a stored template.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

use super::Error;

const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";
const XML_CONTENT_TYPE: &str = "application/xml";
const MPNS_CONTENT_TYPE: &str = "text/xml";

/// Push platforms understood by the notification provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple Push Notification service.
    Apns,
    /// Firebase Cloud Messaging.
    Fcm,
    /// Windows Push Notification Services.
    Wns,
    /// Microsoft Push Notification Service (Windows Phone).
    Mpns,
    /// Amazon Device Messaging.
    Adm,
    /// Baidu Cloud Push.
    Baidu,
}

impl Platform {
    /// Every recognised platform.
    pub const ALL: [Self; 6] = [
        Self::Apns,
        Self::Fcm,
        Self::Wns,
        Self::Mpns,
        Self::Adm,
        Self::Baidu,
    ];

    /// Lower-case platform identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apns => "apns",
            Self::Fcm => "fcm",
            Self::Wns => "wns",
            Self::Mpns => "mpns",
            Self::Adm => "adm",
            Self::Baidu => "baidu",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a platform name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == normalised)
            .ok_or_else(|| UnknownPlatform(raw.to_owned()))
    }
}

/// Unvalidated notification fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Platform name.
    pub platform: Option<String>,
    /// Notification body text.
    pub message: Option<String>,
    /// Optional title.
    pub title: Option<String>,
    /// Tag filter for fan-out sends.
    pub tags: Vec<String>,
    /// Registered device handle for direct sends.
    pub device_handle: Option<String>,
    /// Provider-stored template name.
    pub template_name: Option<String>,
    /// Values substituted into the template.
    pub template_properties: Option<BTreeMap<String, String>>,
}

/// Content of a validated notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationContent {
    /// Platform-native alert.
    Alert {
        /// Target platform.
        platform: Platform,
        /// Optional title.
        title: Option<String>,
        /// Body text.
        message: String,
    },
    /// Provider-stored template filled with properties.
    Template {
        /// Template name.
        name: String,
        /// Template properties.
        properties: BTreeMap<String, String>,
    },
}

/// Where a notification is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTarget {
    /// A single registered device.
    Device(String),
    /// Every device matching any of the tags; an empty list broadcasts.
    Tags(Vec<String>),
}

/// Validated notification ready for payload shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    content: NotificationContent,
    target: DispatchTarget,
}

impl TryFrom<NotificationDraft> for NotificationRequest {
    type Error = Error;

    fn try_from(draft: NotificationDraft) -> Result<Self, Self::Error> {
        let NotificationDraft {
            platform,
            message,
            title,
            tags,
            device_handle,
            template_name,
            template_properties,
        } = draft;

        let content = match (present(template_name), template_properties) {
            (Some(name), Some(properties)) => NotificationContent::Template { name, properties },
            _ => {
                let (Some(raw_platform), Some(message)) = (present(platform), present(message))
                else {
                    return Err(Error::validation("platform and message are required"));
                };
                let platform = raw_platform
                    .parse::<Platform>()
                    .map_err(|UnknownPlatform(raw)| Error::unsupported_platform(&raw))?;
                NotificationContent::Alert {
                    platform,
                    title: present(title),
                    message,
                }
            }
        };

        let target = match present(device_handle) {
            Some(handle) => DispatchTarget::Device(handle),
            None => DispatchTarget::Tags(
                tags.into_iter()
                    .filter(|tag| !tag.trim().is_empty())
                    .collect(),
            ),
        };

        Ok(Self { content, target })
    }
}

impl NotificationRequest {
    /// Validated content.
    pub fn content(&self) -> &NotificationContent {
        &self.content
    }

    /// Delivery target.
    pub fn target(&self) -> &DispatchTarget {
        &self.target
    }

    /// Shape the provider payload for this notification.
    ///
    /// `now` stamps payloads that carry a send time.
    pub fn payload(&self, now: DateTime<Utc>) -> NotificationPayload {
        match &self.content {
            NotificationContent::Template { properties, .. } => template_payload(properties),
            NotificationContent::Alert {
                platform,
                title,
                message,
            } => {
                let title = title.as_deref();
                match platform {
                    Platform::Apns => apns_payload(title, message),
                    Platform::Fcm => fcm_payload(title, message, now),
                    Platform::Wns => wns_payload(title, message),
                    Platform::Mpns => mpns_payload(title, message),
                    Platform::Adm => adm_payload(title, message),
                    Platform::Baidu => baidu_payload(title, message),
                }
            }
        }
    }
}

/// Payload format label forwarded alongside the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// Platform-native payload.
    Platform(Platform),
    /// Template properties.
    Template,
}

impl PayloadFormat {
    /// Label sent to the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform(platform) => platform.as_str(),
            Self::Template => "template",
        }
    }
}

/// Shaped notification body plus the headers the provider expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Format label.
    pub format: PayloadFormat,
    /// Serialised body.
    pub body: String,
    /// MIME type of `body`.
    pub content_type: &'static str,
    /// Extra provider headers.
    pub headers: Vec<(&'static str, String)>,
}

impl NotificationPayload {
    fn json(format: PayloadFormat, body: &Value) -> Self {
        Self {
            format,
            body: body.to_string(),
            content_type: JSON_CONTENT_TYPE,
            headers: Vec::new(),
        }
    }

    fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn title_and_body(title: Option<&str>, body_key: &str, body: &str) -> Value {
    let mut fields = Map::new();
    if let Some(title) = title {
        fields.insert("title".to_owned(), Value::from(title));
    }
    fields.insert(body_key.to_owned(), Value::from(body));
    Value::Object(fields)
}

fn apns_payload(title: Option<&str>, message: &str) -> NotificationPayload {
    let body = json!({
        "aps": {
            "alert": title_and_body(title, "body", message),
            "sound": "default",
        }
    });
    NotificationPayload::json(PayloadFormat::Platform(Platform::Apns), &body)
        .with_header("apns-priority", "10")
}

fn fcm_payload(title: Option<&str>, message: &str, now: DateTime<Utc>) -> NotificationPayload {
    let body = json!({
        "notification": title_and_body(title, "body", message),
        "data": { "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true) },
    });
    NotificationPayload::json(PayloadFormat::Platform(Platform::Fcm), &body)
}

fn wns_payload(title: Option<&str>, message: &str) -> NotificationPayload {
    let texts = match title {
        Some(title) => format!(
            "<text id=\"1\">{}</text><text id=\"2\">{}</text>",
            escape_xml(title),
            escape_xml(message)
        ),
        None => format!("<text id=\"1\">{}</text>", escape_xml(message)),
    };
    let template = if title.is_some() {
        "ToastText02"
    } else {
        "ToastText01"
    };
    NotificationPayload {
        format: PayloadFormat::Platform(Platform::Wns),
        body: format!(
            "<toast><visual><binding template=\"{template}\">{texts}</binding></visual></toast>"
        ),
        content_type: XML_CONTENT_TYPE,
        headers: Vec::new(),
    }
    .with_header("X-WNS-Type", "wns/toast")
}

fn mpns_payload(title: Option<&str>, message: &str) -> NotificationPayload {
    NotificationPayload {
        format: PayloadFormat::Platform(Platform::Mpns),
        body: format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <wp:Notification xmlns:wp=\"WPNotification\"><wp:Toast>\
             <wp:Text1>{}</wp:Text1><wp:Text2>{}</wp:Text2>\
             </wp:Toast></wp:Notification>",
            escape_xml(title.unwrap_or_default()),
            escape_xml(message)
        ),
        content_type: MPNS_CONTENT_TYPE,
        headers: Vec::new(),
    }
    .with_header("X-WindowsPhone-Target", "toast")
    .with_header("X-NotificationClass", "2")
}

fn adm_payload(title: Option<&str>, message: &str) -> NotificationPayload {
    let body = json!({ "data": title_and_body(title, "message", message) });
    NotificationPayload::json(PayloadFormat::Platform(Platform::Adm), &body)
}

fn baidu_payload(title: Option<&str>, message: &str) -> NotificationPayload {
    let body = title_and_body(title, "description", message);
    NotificationPayload::json(PayloadFormat::Platform(Platform::Baidu), &body)
}

fn template_payload(properties: &BTreeMap<String, String>) -> NotificationPayload {
    let body = json!(properties);
    NotificationPayload::json(PayloadFormat::Template, &body)
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
