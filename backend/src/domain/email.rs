//! Provider-agnostic email message and its validation rules.
//!
//! Inbound adapters collect loosely typed fields into an [`EmailDraft`]; the
//! draft becomes an [`EmailMessage`] only after every rule passes, so the
//! email port never sees an unvalidated payload.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Error;

#[expect(clippy::expect_used, reason = "the pattern is a compile-time literal")]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Syntactically valid email address of the form `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an address.
    ///
    /// # Examples
    /// ```
    /// use comms_gateway::domain::email::EmailAddress;
    ///
    /// assert!(EmailAddress::parse("ada@example.com").is_some());
    /// assert!(EmailAddress::parse("ada@example").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        EMAIL_PATTERN
            .is_match(raw)
            .then(|| Self(raw.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attachment forwarded verbatim to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// MIME type of the attachment.
    pub content_type: String,
    /// Base64-encoded attachment body.
    #[serde(alias = "contentInBase64")]
    pub base64_content: String,
}

/// Unvalidated email fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDraft {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// Reply-to address.
    pub reply_to: Option<String>,
    /// Attachments passed through untouched.
    pub attachments: Vec<Attachment>,
}

/// Validated, provider-agnostic email message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    sender_address: String,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_body: Option<String>,
    to: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<EmailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

impl EmailMessage {
    /// Validate a draft and attach the configured sender.
    ///
    /// Rules run in order and stop at the first failure: recipients present,
    /// subject present, a body present, then every address well-formed.
    ///
    /// # Errors
    /// Returns [`Error::validation`] naming the first broken rule.
    ///
    /// # Examples
    /// ```
    /// use comms_gateway::domain::email::{EmailDraft, EmailMessage};
    ///
    /// let draft = EmailDraft {
    ///     to: vec!["ada@example.com".into()],
    ///     subject: Some("Hello".into()),
    ///     text_body: Some("hi".into()),
    ///     ..EmailDraft::default()
    /// };
    /// let message = EmailMessage::from_draft(draft, "noreply@example.com").expect("valid");
    /// assert_eq!(message.to().len(), 1);
    /// ```
    pub fn from_draft(draft: EmailDraft, sender_address: &str) -> Result<Self, Error> {
        let EmailDraft {
            to,
            cc,
            bcc,
            subject,
            html_body,
            text_body,
            reply_to,
            attachments,
        } = draft;

        if to.is_empty() {
            return Err(Error::validation("Recipient email address is required"));
        }
        let subject = present(subject).ok_or_else(|| Error::validation("Email subject is required"))?;
        let html_body = present(html_body);
        let text_body = present(text_body);
        if html_body.is_none() && text_body.is_none() {
            return Err(Error::validation(
                "Either htmlContent or textContent is required",
            ));
        }

        let to = parse_addresses(&to)?;
        let cc = parse_addresses(&cc)?;
        let bcc = parse_addresses(&bcc)?;
        let reply_to = present(reply_to)
            .map(|raw| parse_address(&raw))
            .transpose()?;

        Ok(Self {
            sender_address: sender_address.to_owned(),
            subject,
            html_body,
            text_body,
            to,
            cc,
            bcc,
            reply_to,
            attachments,
        })
    }

    /// Configured sender address.
    pub fn sender_address(&self) -> &str {
        self.sender_address.as_str()
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// HTML body, if any.
    pub fn html_body(&self) -> Option<&str> {
        self.html_body.as_deref()
    }

    /// Plain-text body, if any.
    pub fn text_body(&self) -> Option<&str> {
        self.text_body.as_deref()
    }

    /// Primary recipients.
    pub fn to(&self) -> &[EmailAddress] {
        &self.to
    }

    /// Carbon-copy recipients.
    pub fn cc(&self) -> &[EmailAddress] {
        &self.cc
    }

    /// Blind carbon-copy recipients.
    pub fn bcc(&self) -> &[EmailAddress] {
        &self.bcc
    }

    /// Reply-to address.
    pub fn reply_to(&self) -> Option<&EmailAddress> {
        self.reply_to.as_ref()
    }

    /// Attachments passed through untouched.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Total number of recipients across to, cc, and bcc.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_address(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::parse(raw)
        .ok_or_else(|| Error::validation(format!("Invalid email address: {raw}")))
}

fn parse_addresses(raw: &[String]) -> Result<Vec<EmailAddress>, Error> {
    raw.iter().map(|address| parse_address(address)).collect()
}
