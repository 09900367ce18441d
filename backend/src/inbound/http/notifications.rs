//! Push notification send endpoint.
//!
//! ```text
//! POST /notifications  Shape a platform payload and hand it to the hub
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::auth::ApiKeyGuard;
use super::envelope::Envelope;
use super::state::HttpState;
use super::validation::{OneOrMany, decode_dto, parse_json, read_body};
use crate::domain::Error;
use crate::domain::notification::{DispatchTarget, NotificationDraft, NotificationRequest};
use crate::inbound::http::ApiResult;

/// Notification submission body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendNotificationRequest {
    /// Target platform name, matched case-insensitively.
    pub platform: Option<String>,
    /// Alert body.
    pub message: Option<String>,
    /// Alert title.
    pub title: Option<String>,
    /// Tag expression members; a single tag or a list.
    pub tags: Option<OneOrMany>,
    /// Registered device handle; wins over `tags`.
    pub device_handle: Option<String>,
    /// Provider-stored template name.
    pub template_name: Option<String>,
    /// Template substitution values.
    pub template_properties: Option<BTreeMap<String, String>>,
}

impl From<SendNotificationRequest> for NotificationDraft {
    fn from(value: SendNotificationRequest) -> Self {
        Self {
            platform: value.platform,
            message: value.message,
            title: value.title,
            tags: OneOrMany::flatten(value.tags),
            device_handle: value.device_handle,
            template_name: value.template_name,
            template_properties: value.template_properties,
        }
    }
}

fn validate_request(body: &[u8]) -> Result<NotificationRequest, Error> {
    let value = parse_json(body)?;
    let dto = decode_dto::<SendNotificationRequest>(value)?;
    NotificationRequest::try_from(NotificationDraft::from(dto))
}

async fn dispatch(state: &HttpState, payload: web::Payload) -> Result<HttpResponse, Error> {
    let body = read_body(payload, state.config.body_limit()).await;
    let request = body
        .and_then(|body| validate_request(&body))
        .inspect_err(|err| {
            warn!(code = err.code().as_str(), error = %err, "notification request rejected");
        })?;

    let now = state.clock.utc();
    let payload = request.payload(now);
    let outcome = match request.target() {
        DispatchTarget::Device(handle) => {
            state.notifications.send_to_device(&payload, handle).await
        }
        DispatchTarget::Tags(tags) => state.notifications.send_to_tags(&payload, tags).await,
    };
    let receipt = outcome.map_err(|err| {
        error!(kind = err.kind(), error = %err, "notification provider failed");
        Error::collaborator(err.message())
    })?;

    info!(
        format = payload.format.as_str(),
        notification_id = receipt.notification_id.as_deref(),
        "notification accepted by provider"
    );
    Ok(HttpResponse::Ok().json(Envelope::success(receipt, now)))
}

/// Validate, shape, and dispatch one notification.
pub async fn send_notification(
    _auth: ApiKeyGuard,
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    dispatch(&state, payload)
        .await
        .map_err(|err| state.reject(err))
}
