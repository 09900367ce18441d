//! Email send endpoint.
//!
//! ```text
//! POST /email  Validate a message and hand it to the email provider
//! ```

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::auth::ApiKeyGuard;
use super::envelope::Envelope;
use super::security::{validate_content_type, validate_origin};
use super::state::HttpState;
use super::validation::{OneOrMany, decode_dto, parse_json, read_body};
use crate::domain::Error;
use crate::domain::email::{Attachment, EmailDraft, EmailMessage};
use crate::inbound::http::ApiResult;

/// Email submission body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendEmailRequest {
    /// Primary recipients; a single address or a list.
    pub to: Option<OneOrMany>,
    /// Carbon-copy recipients.
    pub cc: Option<OneOrMany>,
    /// Blind carbon-copy recipients.
    pub bcc: Option<OneOrMany>,
    /// Subject line.
    pub subject: Option<String>,
    /// HTML body.
    pub html_content: Option<String>,
    /// Plain-text body.
    pub text_content: Option<String>,
    /// Reply-to address.
    pub reply_to: Option<String>,
    /// Attachments forwarded untouched.
    pub attachments: Option<Vec<Attachment>>,
}

impl From<SendEmailRequest> for EmailDraft {
    fn from(value: SendEmailRequest) -> Self {
        Self {
            to: OneOrMany::flatten(value.to),
            cc: OneOrMany::flatten(value.cc),
            bcc: OneOrMany::flatten(value.bcc),
            subject: value.subject,
            html_body: value.html_content,
            text_body: value.text_content,
            reply_to: value.reply_to,
            attachments: value.attachments.unwrap_or_default(),
        }
    }
}

fn validate_request(
    req: &HttpRequest,
    state: &HttpState,
    body: &[u8],
) -> Result<EmailMessage, Error> {
    let value = parse_json(body)?;
    validate_content_type(req)?;
    validate_origin(req, state.config.origins())?;
    let sender = state.config.sender_address().ok_or_else(|| {
        Error::server_misconfigured("Email sender address is not configured on the server")
    })?;
    let draft = decode_dto::<SendEmailRequest>(value)?;
    EmailMessage::from_draft(draft.into(), sender)
}

async fn deliver(
    req: &HttpRequest,
    state: &HttpState,
    payload: web::Payload,
) -> Result<HttpResponse, Error> {
    let body = read_body(payload, state.config.body_limit()).await;
    let message = body
        .and_then(|body| validate_request(req, state, &body))
        .inspect_err(|err| {
            warn!(code = err.code().as_str(), error = %err, "email request rejected");
        })?;

    let receipt = state.email.send(&message).await.map_err(|err| {
        error!(kind = err.kind(), error = %err, "email provider failed");
        Error::collaborator(err.message())
    })?;

    info!(
        id = %receipt.id,
        recipients = message.recipient_count(),
        "email accepted by provider"
    );
    Ok(HttpResponse::Ok().json(Envelope::success(receipt, state.clock.utc())))
}

/// Validate and send one email.
///
/// Checks run in order and stop at the first failure: API key, body size,
/// JSON syntax, content type, origin, sender configuration, then message
/// fields.
pub async fn send_email(
    _auth: ApiKeyGuard,
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    deliver(&req, &state, payload)
        .await
        .map_err(|err| state.reject(err))
}
