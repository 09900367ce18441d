//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::state::{HttpState, HttpStatePorts};
use crate::config::GatewayConfig;
use crate::domain::ports::{MockEmailSender, MockNotificationSender};

/// API key configured by handler tests.
pub const TEST_API_KEY: &str = "test-api-key";

/// Serialised form of [`fixture_time`].
pub const FIXTURE_TIMESTAMP: &str = "2026-03-14T09:26:53Z";

/// Instant returned by the fixture clock.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture time")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_time()
    }
}

fn build_state(
    config: GatewayConfig,
    email: MockEmailSender,
    notifications: MockNotificationSender,
) -> HttpState {
    HttpState::new(
        config,
        HttpStatePorts {
            email: Arc::new(email),
            notifications: Arc::new(notifications),
        },
    )
    .with_clock(Arc::new(FixtureClock))
}

/// State whose collaborators panic when called.
pub fn state_with_config(config: GatewayConfig) -> HttpState {
    build_state(config, MockEmailSender::new(), MockNotificationSender::new())
}

/// State wired to the supplied email mock.
pub fn state_with_email(config: GatewayConfig, email: MockEmailSender) -> HttpState {
    build_state(config, email, MockNotificationSender::new())
}

/// State wired to the supplied notification mock.
pub fn state_with_notifications(
    config: GatewayConfig,
    notifications: MockNotificationSender,
) -> HttpState {
    build_state(config, MockEmailSender::new(), notifications)
}
