//! Domain ports defining the edges of the hexagon.
//!
//! The gateway drives two external collaborators: an email provider and a
//! push-notification provider. Each port exposes a strongly typed error so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod email_sender;
mod notification_sender;

#[cfg(test)]
pub use email_sender::MockEmailSender;
pub use email_sender::{EmailReceipt, EmailSendError, EmailSender};
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use notification_sender::{NotificationReceipt, NotificationSendError, NotificationSender};
