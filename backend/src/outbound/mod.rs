//! Outbound adapters implementing the collaborator ports.
//!
//! - **email_relay** and **notification_relay**: reqwest-backed provider
//!   relays.
//! - **dry_run**: log-only stand-ins used when no endpoint is configured.
//!
//! Adapters translate between domain values and provider wire formats and
//! carry no validation logic.

pub mod dry_run;
pub mod email_relay;
pub mod notification_relay;
mod relay;

pub use relay::RelayBuildError;
