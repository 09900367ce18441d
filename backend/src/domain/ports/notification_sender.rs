//! Driven port for handing shaped push notifications to an external provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;
use crate::domain::notification::NotificationPayload;

define_port_error! {
    /// Errors surfaced by notification provider adapters.
    pub enum NotificationSendError {
        /// The provider refused the notification.
        Rejected => "{message}",
        /// The provider could not be reached or answered unintelligibly.
        Transport => "notification provider request failed: {message}",
    }
}

/// Provider acknowledgement for an accepted notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReceipt {
    /// Provider-assigned notification identifier.
    #[serde(default)]
    pub notification_id: Option<String>,
    /// Provider-reported outcome, e.g. `Enqueued`.
    #[serde(default)]
    pub state: Option<String>,
    /// Correlation identifier for provider-side diagnostics.
    #[serde(default)]
    pub tracking_id: Option<String>,
}

/// Port for sending push notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver to a single registered device.
    async fn send_to_device(
        &self,
        payload: &NotificationPayload,
        device_handle: &str,
    ) -> Result<NotificationReceipt, NotificationSendError>;

    /// Deliver to every device matching any tag; an empty slice broadcasts.
    async fn send_to_tags(
        &self,
        payload: &NotificationPayload,
        tags: &[String],
    ) -> Result<NotificationReceipt, NotificationSendError>;
}
