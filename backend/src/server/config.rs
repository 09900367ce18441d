//! Server configuration assembled from [`GatewaySettings`].

use std::net::SocketAddr;
use std::sync::Arc;

use comms_gateway::config::{ConfigError, GatewayConfig, GatewaySettings};
use comms_gateway::domain::ports::{EmailSender, NotificationSender};
use comms_gateway::inbound::http::state::HttpStatePorts;
use comms_gateway::outbound::RelayBuildError;
use comms_gateway::outbound::dry_run::{DryRunEmailSender, DryRunNotificationSender};
use comms_gateway::outbound::email_relay::HttpEmailRelay;
use comms_gateway::outbound::notification_relay::HttpNotificationRelay;
use tracing::{info, warn};

/// Failures preventing the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// A setting could not be interpreted.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A provider relay could not be built.
    #[error(transparent)]
    Relay(#[from] RelayBuildError),
}

/// Everything the HTTP server needs to start.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) gateway: GatewayConfig,
    pub(crate) ports: HttpStatePorts,
}

impl ServerConfig {
    /// Resolve settings into adapters and immutable configuration.
    ///
    /// Providers without a configured endpoint fall back to log-only
    /// adapters.
    ///
    /// # Errors
    /// Returns [`StartupError`] for malformed settings or unbuildable relays.
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self, StartupError> {
        let gateway = settings.gateway_config();
        if gateway.api_key().is_none() {
            warn!("no API key configured; send endpoints will answer 500");
        }
        if gateway.sender_address().is_none() {
            warn!("no sender address configured; email sends will answer 500");
        }

        Ok(Self {
            bind_addr: settings.bind_addr()?,
            gateway,
            ports: HttpStatePorts {
                email: build_email_sender(settings)?,
                notifications: build_notification_sender(settings)?,
            },
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn build_email_sender(settings: &GatewaySettings) -> Result<Arc<dyn EmailSender>, StartupError> {
    match settings.email_endpoint()? {
        Some(endpoint) => {
            info!(%endpoint, "relaying email to provider");
            Ok(Arc::new(HttpEmailRelay::new(
                endpoint,
                settings.email_access_key.clone(),
                settings.request_timeout(),
            )?))
        }
        None => {
            warn!("no email endpoint configured; email sends are dry runs");
            Ok(Arc::new(DryRunEmailSender))
        }
    }
}

fn build_notification_sender(
    settings: &GatewaySettings,
) -> Result<Arc<dyn NotificationSender>, StartupError> {
    match settings.notification_endpoint()? {
        Some(endpoint) => {
            let relay = HttpNotificationRelay::new(
                endpoint,
                settings.notification_hub.as_deref(),
                settings.notification_access_key.clone(),
                settings.request_timeout(),
            )?;
            info!(endpoint = %relay.messages_url(), "relaying notifications to hub");
            Ok(Arc::new(relay))
        }
        None => {
            warn!("no notification endpoint configured; notification sends are dry runs");
            Ok(Arc::new(DryRunNotificationSender))
        }
    }
}
