//! Uniform JSON envelope returned by the send endpoints.
//!
//! Successful sends flatten the provider receipt next to `success` and
//! `timestamp`; failures carry `error` and `code` in the same position so
//! clients can branch on `success` alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ErrorCode};

/// Response envelope wrapping a success receipt or an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Whether the provider accepted the request.
    pub success: bool,
    /// Receipt or error fields.
    #[serde(flatten)]
    pub body: T,
    /// Time the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    /// Wrap a successful receipt.
    pub fn success(body: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            body,
            timestamp,
        }
    }
}

/// Error fields carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub error: String,
    /// Machine-readable failure category.
    pub code: ErrorCode,
}

impl Envelope<ErrorBody> {
    /// Wrap a domain error.
    pub fn failure(error: &Error, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            body: ErrorBody {
                error: error.message().to_owned(),
                code: error.code(),
            },
            timestamp,
        }
    }
}
