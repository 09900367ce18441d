//! Domain primitives for the gateway.
//!
//! Purpose: define the transport-agnostic rules the gateway enforces before
//! anything reaches a provider. Keep types immutable and document invariants
//! in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: failure taxonomy shared by every endpoint.
//! - auth: configured API key and timing-safe verification.
//! - email: address predicate and validated email messages.
//! - notification: platform enum, dispatch targets, payload shaping.
//! - ports: email and notification collaborator traits.

pub mod auth;
pub mod email;
pub mod error;
pub mod notification;
pub mod ports;

pub use self::error::{Error, ErrorCode};

/// Header carrying the per-request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
