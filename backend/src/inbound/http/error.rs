//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the shared JSON envelope and status
//! codes. Failures are stamped with the request clock before they leave a
//! handler, so error bodies carry the same time source as success bodies.

use actix_web::http::header::{ALLOW, WWW_AUTHENTICATE};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, Utc};

use super::envelope::Envelope;
use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Methods accepted by the send endpoints, advertised on `405` responses.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Domain error stamped with the instant it was reported.
///
/// Build one through [`super::state::HttpState::reject`] so the timestamp
/// comes from the injected clock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    error: Error,
    timestamp: DateTime<Utc>,
}

impl ApiError {
    /// Pair a domain error with its timestamp.
    pub fn new(error: Error, timestamp: DateTime<Utc>) -> Self {
        Self { error, timestamp }
    }

    /// Underlying domain error.
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Instant rendered into the envelope.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::InvalidJson
        | ErrorCode::InvalidContentType
        | ErrorCode::ValidationError
        | ErrorCode::UnsupportedPlatform => StatusCode::BAD_REQUEST,
        ErrorCode::MissingCredential => StatusCode::UNAUTHORIZED,
        ErrorCode::UnauthorizedOrigin | ErrorCode::InvalidCredential => StatusCode::FORBIDDEN,
        ErrorCode::ServerMisconfigured | ErrorCode::CollaboratorFailure => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.error.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self.error.code() {
            ErrorCode::MissingCredential => {
                builder.insert_header((WWW_AUTHENTICATE, "Bearer"));
            }
            ErrorCode::MethodNotAllowed => {
                builder.insert_header((ALLOW, ALLOWED_METHODS));
            }
            _ => {}
        }
        builder.json(Envelope::failure(&self.error, self.timestamp))
    }
}

#[cfg(test)]
mod tests;
