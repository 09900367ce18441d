//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and immutable configuration, and remain testable
//! without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use super::error::ApiError;
use crate::config::GatewayConfig;
use crate::domain::Error;
use crate::domain::ports::{EmailSender, NotificationSender};

/// Parameter object bundling the collaborator ports.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Email provider adapter.
    pub email: Arc<dyn EmailSender>,
    /// Notification provider adapter.
    pub notifications: Arc<dyn NotificationSender>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Immutable gateway configuration.
    pub config: Arc<GatewayConfig>,
    /// Email provider adapter.
    pub email: Arc<dyn EmailSender>,
    /// Notification provider adapter.
    pub notifications: Arc<dyn NotificationSender>,
    /// Time source for response envelopes and payload stamps.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state using the system clock.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use comms_gateway::config::{GatewayConfig, OriginPolicy};
    /// use comms_gateway::inbound::http::state::{HttpState, HttpStatePorts};
    /// use comms_gateway::outbound::dry_run::{DryRunEmailSender, DryRunNotificationSender};
    ///
    /// let config = GatewayConfig::new(None, OriginPolicy::Any, None);
    /// let state = HttpState::new(
    ///     config,
    ///     HttpStatePorts {
    ///         email: Arc::new(DryRunEmailSender),
    ///         notifications: Arc::new(DryRunNotificationSender),
    ///     },
    /// );
    /// assert!(state.config.api_key().is_none());
    /// ```
    pub fn new(config: GatewayConfig, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            email,
            notifications,
        } = ports;
        Self {
            config: Arc::new(config),
            email,
            notifications,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Stamp a domain error with the current time for rendering.
    pub fn reject(&self, error: Error) -> ApiError {
        ApiError::new(error, self.clock.utc())
    }
}
