//! Per-event violation notice.

use mailer::{DeliveryError, DeliveryReceipt, Mailer, OutgoingEmail};

use crate::models::EventRecord;

pub const SUBJECT: &str = "Freeze Change Violation";


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Builds the notice for one event. Never fails: absent fields are rendered
/// with their placeholder.
pub fn compose(record: &EventRecord) -> Notification {
    let body = format!(
        "Violation detected:\n\
         Event Name: {}\n\
         Event Time: {}\n\
         Event ID: {}\n\
         AWS Account ID: {}\n\
         User Who Made Changes: {}",
        record.name(),
        record.time(),
        record.id(),
        record.account_id(),
        record.actor(),
    );

    Notification {
        subject: SUBJECT.to_string(),
        body,
    }
}

/// Sends one email for `record`. Exactly one delivery attempt is made.
pub async fn notify(
    mailer: &dyn Mailer,
    sender: &str,
    recipient: &str,
    record: &EventRecord,
) -> Result<DeliveryReceipt, DeliveryError> {
    let notification = compose(record);

    tracing::info!("Preparing to send email notification for event {}", record.id());

    mailer.send(&OutgoingEmail {
        sender: sender.to_string(),
        recipient: recipient.to_string(),
        subject: notification.subject,
        body: notification.body,
    }).await
}
