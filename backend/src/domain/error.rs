//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps each
//! [`ErrorCode`] to a status code and renders the shared JSON envelope.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The endpoint only accepts `POST`.
    MethodNotAllowed,
    /// The request body is not valid JSON.
    InvalidJson,
    /// The request body exceeds the configured size limit.
    PayloadTooLarge,
    /// The `Content-Type` header does not announce JSON.
    InvalidContentType,
    /// The `Origin` header is not on the configured allow-list.
    UnauthorizedOrigin,
    /// No API key was supplied through any carrier.
    MissingCredential,
    /// The supplied API key does not match the configured secret.
    InvalidCredential,
    /// The gateway is missing configuration it needs to serve the request.
    ServerMisconfigured,
    /// A field-level business rule failed.
    ValidationError,
    /// The notification platform is not one of the recognised values.
    UnsupportedPlatform,
    /// The external provider reported a failure.
    CollaboratorFailure,
}

impl ErrorCode {
    /// Snake-case identifier used in response bodies and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::InvalidJson => "invalid_json",
            Self::PayloadTooLarge => "payload_too_large",
            Self::InvalidContentType => "invalid_content_type",
            Self::UnauthorizedOrigin => "unauthorized_origin",
            Self::MissingCredential => "missing_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::ServerMisconfigured => "server_misconfigured",
            Self::ValidationError => "validation_error",
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::CollaboratorFailure => "collaborator_failure",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Method not allowed",
            Self::InvalidJson => "Invalid JSON in request body",
            Self::PayloadTooLarge => "Request body is too large",
            Self::InvalidContentType => "Content-Type must be application/json",
            Self::UnauthorizedOrigin => "Origin not allowed",
            Self::MissingCredential => "API key is required",
            Self::InvalidCredential => "Invalid API key",
            Self::ServerMisconfigured => "Server configuration error",
            Self::ValidationError => "Request validation failed",
            Self::UnsupportedPlatform => "Unsupported platform",
            Self::CollaboratorFailure => "Provider request failed",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank; blank input falls back to a per-code default.
///
/// # Examples
/// ```
/// use comms_gateway::domain::{Error, ErrorCode};
///
/// let err = Error::validation("Email subject is required");
/// assert_eq!(err.code(), ErrorCode::ValidationError);
/// assert_eq!(err.message(), "Email subject is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    /// Create a new error for the given code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`ErrorCode::MethodNotAllowed`].
    pub fn method_not_allowed(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotAllowed,
            format!("Method {method} not allowed; use POST"),
        )
    }

    /// Convenience constructor for [`ErrorCode::InvalidJson`].
    pub fn invalid_json(detail: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidJson,
            format!("Invalid JSON in request body: {detail}"),
        )
    }

    /// Convenience constructor for [`ErrorCode::PayloadTooLarge`].
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            ErrorCode::PayloadTooLarge,
            format!("Request body exceeds the {limit}-byte limit"),
        )
    }

    /// Convenience constructor for [`ErrorCode::InvalidContentType`].
    pub fn invalid_content_type() -> Self {
        Self::new(ErrorCode::InvalidContentType, "")
    }

    /// Convenience constructor for [`ErrorCode::UnauthorizedOrigin`].
    pub fn unauthorized_origin() -> Self {
        Self::new(ErrorCode::UnauthorizedOrigin, "")
    }

    /// Convenience constructor for [`ErrorCode::MissingCredential`].
    pub fn missing_credential() -> Self {
        Self::new(
            ErrorCode::MissingCredential,
            "API key is required. Supply it via the Authorization header, \
             the x-api-key header, or the api_key query parameter",
        )
    }

    /// Convenience constructor for [`ErrorCode::InvalidCredential`].
    pub fn invalid_credential() -> Self {
        Self::new(ErrorCode::InvalidCredential, "")
    }

    /// Convenience constructor for [`ErrorCode::ServerMisconfigured`].
    pub fn server_misconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServerMisconfigured, message)
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Convenience constructor for [`ErrorCode::UnsupportedPlatform`].
    pub fn unsupported_platform(platform: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedPlatform,
            format!("Unsupported platform: {platform}"),
        )
    }

    /// Convenience constructor for [`ErrorCode::CollaboratorFailure`].
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CollaboratorFailure, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
