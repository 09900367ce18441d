//! Communications gateway library: validates email and push-notification
//! requests and forwards them to external providers.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::{Cors, Trace};
