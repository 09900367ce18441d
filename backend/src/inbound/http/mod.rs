//! HTTP inbound adapter exposing the gateway endpoints.

pub mod auth;
pub mod email;
pub mod envelope;
pub mod error;
pub mod health;
pub mod notifications;
pub mod routes;
pub mod security;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::{ApiError, ApiResult};
