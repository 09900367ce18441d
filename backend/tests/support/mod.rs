//! Shared helpers for gateway integration tests.
//!
//! Integration tests compile as separate crates, so the crate's `mockall`
//! mocks are unavailable here; recording stubs stand in for the providers.

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use comms_gateway::config::{GatewayConfig, OriginPolicy};
use comms_gateway::domain::auth::ApiKey;
use comms_gateway::domain::email::EmailMessage;
use comms_gateway::domain::notification::NotificationPayload;
use comms_gateway::domain::ports::{
    EmailReceipt, EmailSendError, EmailSender, NotificationReceipt, NotificationSendError,
    NotificationSender,
};
use comms_gateway::inbound::http::routes;
use comms_gateway::inbound::http::state::{HttpState, HttpStatePorts};
use comms_gateway::{Cors, Trace};

pub const API_KEY: &str = "integration-key";
pub const SENDER: &str = "noreply@example.com";
pub const TIMESTAMP: &str = "2026-05-01T12:00:00Z";

struct FixedClock;

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
            .single()
            .expect("valid fixture time")
    }
}

/// Email provider stub recording every accepted message.
#[derive(Default)]
pub struct StubEmailSender {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub failure: Option<String>,
}

#[async_trait]
impl EmailSender for StubEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailSendError> {
        if let Some(reason) = &self.failure {
            return Err(EmailSendError::rejected(reason.clone()));
        }
        let mut sent = self.sent.lock().expect("stub lock");
        sent.push(message.clone());
        Ok(EmailReceipt {
            id: format!("stub-email-{}", sent.len()),
            status: Some("Queued".to_owned()),
        })
    }
}

/// Dispatch observed by [`StubNotificationSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Device(String),
    Tags(Vec<String>),
}

/// Notification provider stub recording every dispatch.
#[derive(Default)]
pub struct StubNotificationSender {
    pub sent: Mutex<Vec<(NotificationPayload, Dispatch)>>,
}

impl StubNotificationSender {
    fn record(&self, payload: &NotificationPayload, dispatch: Dispatch) -> NotificationReceipt {
        let mut sent = self.sent.lock().expect("stub lock");
        sent.push((payload.clone(), dispatch));
        NotificationReceipt {
            notification_id: Some(format!("stub-notification-{}", sent.len())),
            state: Some("Enqueued".to_owned()),
            tracking_id: None,
        }
    }
}

#[async_trait]
impl NotificationSender for StubNotificationSender {
    async fn send_to_device(
        &self,
        payload: &NotificationPayload,
        device_handle: &str,
    ) -> Result<NotificationReceipt, NotificationSendError> {
        Ok(self.record(payload, Dispatch::Device(device_handle.to_owned())))
    }

    async fn send_to_tags(
        &self,
        payload: &NotificationPayload,
        tags: &[String],
    ) -> Result<NotificationReceipt, NotificationSendError> {
        Ok(self.record(payload, Dispatch::Tags(tags.to_vec())))
    }
}

/// Gateway wiring under test.
#[derive(Clone)]
pub struct Gateway {
    pub config: GatewayConfig,
    pub email: Arc<StubEmailSender>,
    pub notifications: Arc<StubNotificationSender>,
}

impl Default for Gateway {
    fn default() -> Self {
        Self {
            config: GatewayConfig::new(
                ApiKey::new(API_KEY),
                OriginPolicy::Any,
                Some(SENDER.to_owned()),
            ),
            email: Arc::default(),
            notifications: Arc::default(),
        }
    }
}

impl Gateway {
    /// Initialise the full application, middleware included.
    pub async fn service(
        &self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        let state = HttpState::new(
            self.config.clone(),
            HttpStatePorts {
                email: self.email.clone(),
                notifications: self.notifications.clone(),
            },
        )
        .with_clock(Arc::new(FixedClock));
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(Cors)
                .wrap(Trace)
                .configure(routes::configure),
        )
        .await
    }
}
