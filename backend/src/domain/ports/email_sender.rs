//! Driven port for handing validated email to an external provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;
use crate::domain::email::EmailMessage;

define_port_error! {
    /// Errors surfaced by email provider adapters.
    pub enum EmailSendError {
        /// The provider refused the message.
        Rejected => "{message}",
        /// The provider could not be reached or answered unintelligibly.
        Transport => "email provider request failed: {message}",
    }
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailReceipt {
    /// Provider-assigned operation identifier.
    pub id: String,
    /// Provider-reported status, e.g. `Queued`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Port for sending a single email message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Submit the message and return the provider receipt.
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailSendError>;
}
