//! API key extraction and the authentication extractor used by send handlers.
//!
//! Credential carriers are tried in a fixed order and the first non-empty
//! value wins. Comparison against the configured secret is delegated to
//! [`crate::domain::auth::verify`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use super::error::ApiError;
use super::state::HttpState;
use crate::domain::{Error, auth};

/// Header carrying a raw API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Query parameter carrying a raw API key.
pub const API_KEY_QUERY_PARAM: &str = "api_key";

const BEARER_PREFIX: &str = "Bearer ";

type CredentialSource = (&'static str, fn(&HttpRequest) -> Option<String>);

/// Credential carriers in precedence order.
const CREDENTIAL_SOURCES: [CredentialSource; 3] = [
    ("authorization", from_authorization_header),
    (API_KEY_HEADER, from_api_key_header),
    (API_KEY_QUERY_PARAM, from_query_string),
];

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

fn from_authorization_header(req: &HttpRequest) -> Option<String> {
    let raw = header_str(req, AUTHORIZATION.as_str())?;
    Some(raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).to_owned())
}

fn from_api_key_header(req: &HttpRequest) -> Option<String> {
    header_str(req, API_KEY_HEADER).map(str::to_owned)
}

fn from_query_string(req: &HttpRequest) -> Option<String> {
    url::form_urlencoded::parse(req.query_string().as_bytes())
        .find(|(name, _)| name == API_KEY_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Return the first non-empty credential and the carrier it came from.
pub fn extract_credential(req: &HttpRequest) -> Option<(&'static str, String)> {
    CREDENTIAL_SOURCES.iter().find_map(|(source, extract)| {
        extract(req)
            .filter(|token| !token.is_empty())
            .map(|token| (*source, token))
    })
}

/// Authenticate a request against the configured key.
///
/// # Errors
/// Propagates the outcome of [`auth::verify`].
pub fn authenticate(req: &HttpRequest, state: &HttpState) -> Result<(), Error> {
    let credential = extract_credential(req);
    let source = credential.as_ref().map(|(source, _)| *source);
    auth::verify(
        state.config.api_key(),
        credential.as_ref().map(|(_, token)| token.as_str()),
    )
    .inspect_err(|error| {
        warn!(
            code = error.code().as_str(),
            source,
            path = req.path(),
            "request rejected by authentication"
        );
    })
}

/// Marker extractor proving the request carried a valid API key.
///
/// Place it first among handler arguments so authentication runs before the
/// body is interpreted.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyGuard;

impl FromRequest for ApiKeyGuard {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let outcome = match req.app_data::<web::Data<HttpState>>() {
            Some(state) => authenticate(req, state)
                .map(|()| ApiKeyGuard)
                .map_err(|error| state.reject(error)),
            // No state means no clock either; fall back to wall time.
            None => Err(ApiError::new(
                Error::server_misconfigured("HTTP state is not registered with the application"),
                chrono::Utc::now(),
            )),
        };
        ready(outcome)
    }
}
