//! Log-only adapters used when no provider endpoint is configured.
//!
//! They accept every request, log what would have been sent, and return a
//! generated receipt so the gateway can run locally end to end.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::email::EmailMessage;
use crate::domain::notification::NotificationPayload;
use crate::domain::ports::{
    EmailReceipt, EmailSendError, EmailSender, NotificationReceipt, NotificationSendError,
    NotificationSender,
};

/// Email adapter that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunEmailSender;

#[async_trait]
impl EmailSender for DryRunEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailSendError> {
        let id = Uuid::new_v4().to_string();
        info!(
            id = %id,
            sender = message.sender_address(),
            recipients = message.recipient_count(),
            attachments = message.attachments().len(),
            "dry run: email not delivered"
        );
        Ok(EmailReceipt {
            id,
            status: Some("Queued".to_owned()),
        })
    }
}

/// Notification adapter that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNotificationSender;

fn dry_run_receipt() -> NotificationReceipt {
    NotificationReceipt {
        notification_id: Some(Uuid::new_v4().to_string()),
        state: Some("Enqueued".to_owned()),
        tracking_id: Some(Uuid::new_v4().to_string()),
    }
}

#[async_trait]
impl NotificationSender for DryRunNotificationSender {
    async fn send_to_device(
        &self,
        payload: &NotificationPayload,
        device_handle: &str,
    ) -> Result<NotificationReceipt, NotificationSendError> {
        info!(
            format = payload.format.as_str(),
            device_handle,
            bytes = payload.body.len(),
            "dry run: notification not delivered"
        );
        Ok(dry_run_receipt())
    }

    async fn send_to_tags(
        &self,
        payload: &NotificationPayload,
        tags: &[String],
    ) -> Result<NotificationReceipt, NotificationSendError> {
        info!(
            format = payload.format.as_str(),
            tags = ?tags,
            broadcast = tags.is_empty(),
            bytes = payload.body.len(),
            "dry run: notification not delivered"
        );
        Ok(dry_run_receipt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::email::{EmailDraft, EmailMessage};
    use crate::domain::notification::{NotificationDraft, NotificationRequest};
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn email_receipts_are_unique() {
        let message = EmailMessage::from_draft(
            EmailDraft {
                to: vec!["ada@example.com".to_owned()],
                subject: Some("Hi".to_owned()),
                text_body: Some("hello".to_owned()),
                ..EmailDraft::default()
            },
            "noreply@example.com",
        )
        .expect("valid message");
        let first = DryRunEmailSender.send(&message).await.expect("accepted");
        let second = DryRunEmailSender.send(&message).await.expect("accepted");
        assert_ne!(first.id, second.id);
        assert_eq!(first.status.as_deref(), Some("Queued"));
    }

    #[rstest]
    #[tokio::test]
    async fn broadcast_is_enqueued() {
        let request = NotificationRequest::try_from(NotificationDraft {
            platform: Some("fcm".to_owned()),
            message: Some("hello".to_owned()),
            ..NotificationDraft::default()
        })
        .expect("valid notification");
        let receipt = DryRunNotificationSender
            .send_to_tags(&request.payload(Utc::now()), &[])
            .await
            .expect("accepted");
        assert_eq!(receipt.state.as_deref(), Some("Enqueued"));
        assert!(receipt.notification_id.is_some());
    }
}
