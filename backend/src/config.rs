//! Gateway configuration loaded via OrthoConfig.
//!
//! [`GatewaySettings`] is the raw, layered input (CLI flags, `GATEWAY_*`
//! environment variables, config files). Request handlers never see it; they
//! receive the immutable [`GatewayConfig`] derived from it at startup.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::auth::ApiKey;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Request body ceiling applied when none is configured (10 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Raw configuration values for the gateway process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEWAY")]
pub struct GatewaySettings {
    /// Shared secret callers must present.
    pub api_key: Option<String>,
    /// Comma-separated `Origin` allow-list; `*` or empty accepts all.
    pub allowed_origins: Option<String>,
    /// Address used as the sender of every email.
    pub sender_address: Option<String>,
    /// Email provider relay endpoint; dry-run when absent.
    pub email_endpoint: Option<String>,
    /// Access key presented to the email provider.
    pub email_access_key: Option<String>,
    /// Notification provider relay endpoint; dry-run when absent.
    pub notification_endpoint: Option<String>,
    /// Notification hub name appended to the endpoint path.
    pub notification_hub: Option<String>,
    /// Access key presented to the notification provider.
    pub notification_access_key: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// Outbound provider request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: Option<usize>,
}

/// Errors raised while interpreting [`GatewaySettings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A provider endpoint is not an absolute URL.
    #[error("invalid {name} '{value}': {source}")]
    InvalidEndpoint {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl GatewaySettings {
    /// Build the immutable per-request configuration.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(
            self.api_key.clone().and_then(ApiKey::new),
            OriginPolicy::parse(self.allowed_origins.as_deref().unwrap_or_default()),
            non_blank(self.sender_address.as_deref()).map(str::to_owned),
        )
        .with_body_limit(self.body_limit())
    }

    /// Return the request body ceiling, falling back to 10 MiB.
    pub fn body_limit(&self) -> usize {
        self.max_body_bytes
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_BODY_LIMIT)
    }

    /// Return the listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = non_blank(self.bind_addr.as_deref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| ConfigError::InvalidBindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Return the email relay endpoint, if configured.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEndpoint`] when the value is not a URL.
    pub fn email_endpoint(&self) -> Result<Option<Url>, ConfigError> {
        parse_endpoint("email_endpoint", self.email_endpoint.as_deref())
    }

    /// Return the notification relay endpoint, if configured.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEndpoint`] when the value is not a URL.
    pub fn notification_endpoint(&self) -> Result<Option<Url>, ConfigError> {
        parse_endpoint("notification_endpoint", self.notification_endpoint.as_deref())
    }

    /// Return the tracing filter, falling back to `info`.
    pub fn log_level(&self) -> &str {
        non_blank(self.log_level.as_deref()).unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Return the outbound request timeout, falling back to 30 seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_endpoint(name: &'static str, raw: Option<&str>) -> Result<Option<Url>, ConfigError> {
    non_blank(raw)
        .map(|value| {
            Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
                name,
                value: value.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Origin allow-list applied to browser callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Every origin, including none, is accepted.
    Any,
    /// Only exact matches are accepted; a missing `Origin` is rejected.
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Parse a comma-separated allow-list.
    ///
    /// # Examples
    /// ```
    /// use comms_gateway::config::OriginPolicy;
    ///
    /// assert_eq!(OriginPolicy::parse("*"), OriginPolicy::Any);
    /// assert_eq!(OriginPolicy::parse(""), OriginPolicy::Any);
    /// let policy = OriginPolicy::parse("https://a.example, https://b.example");
    /// assert!(policy.allows(Some("https://b.example")));
    /// assert!(!policy.allows(None));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let entries: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect();
        if entries.is_empty() || entries.iter().any(|entry| entry == "*") {
            Self::Any
        } else {
            Self::AllowList(entries)
        }
    }

    /// Return whether a request carrying `origin` may proceed.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::AllowList(entries) => {
                origin.is_some_and(|origin| entries.iter().any(|entry| entry == origin))
            }
        }
    }
}

/// Immutable configuration injected into every request.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    api_key: Option<ApiKey>,
    origins: OriginPolicy,
    sender_address: Option<String>,
    body_limit: usize,
}

impl GatewayConfig {
    /// Assemble configuration from its parts.
    pub fn new(
        api_key: Option<ApiKey>,
        origins: OriginPolicy,
        sender_address: Option<String>,
    ) -> Self {
        Self {
            api_key,
            origins,
            sender_address,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Replace the request body ceiling.
    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Configured API key; `None` means the server is misconfigured.
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Origin allow-list.
    pub fn origins(&self) -> &OriginPolicy {
        &self.origins
    }

    /// Configured email sender address.
    pub fn sender_address(&self) -> Option<&str> {
        self.sender_address.as_deref()
    }

    /// Largest request body handlers will read.
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}
