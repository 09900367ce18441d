//! Request-level checks applied to browser-facing email submissions.

use actix_web::HttpRequest;
use actix_web::http::header::{CONTENT_TYPE, ORIGIN};
use tracing::warn;

use crate::config::OriginPolicy;
use crate::domain::Error;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Reject requests whose `Origin` is not admitted by `policy`.
///
/// # Errors
/// Returns [`Error::unauthorized_origin`] when the policy refuses the origin.
pub fn validate_origin(req: &HttpRequest, policy: &OriginPolicy) -> Result<(), Error> {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok());
    if policy.allows(origin) {
        Ok(())
    } else {
        warn!(origin, path = req.path(), "origin not in allow-list");
        Err(Error::unauthorized_origin())
    }
}

/// Require a JSON `Content-Type`, matched case-insensitively.
///
/// # Errors
/// Returns [`Error::invalid_content_type`] when the header is missing or does
/// not mention `application/json`.
pub fn validate_content_type(req: &HttpRequest) -> Result<(), Error> {
    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE));
    if is_json {
        Ok(())
    } else {
        Err(Error::invalid_content_type())
    }
}
