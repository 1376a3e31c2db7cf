//! Email delivery over Amazon SES.
//!
//! [`Mailer`] is the seam the notifier talks to; [`SesMailer`] is the
//! production implementation backed by `aws-sdk-sesv2`.

use async_trait::async_trait;
use aws_sdk_sesv2::Client;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use thiserror::Error;


/// A single plain-text email with one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// What the delivery service handed back for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("SES send failed: {0}")]
    Ses(#[from] aws_sdk_sesv2::Error),

    #[error("invalid email request: {0}")]
    Request(#[from] aws_sdk_sesv2::error::BuildError),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Makes exactly one delivery attempt. No retries.
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError>;
}


pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, DeliveryError> {
        let message = build_message(&email.subject, &email.body)?;

        let output = self.client
            .send_email()
            .from_email_address(&email.sender)
            .destination(
                Destination::builder()
                    .to_addresses(&email.recipient)
                    .build(),
            )
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(aws_sdk_sesv2::Error::from)?;

        tracing::debug!("SES accepted message for {}", email.recipient);

        Ok(DeliveryReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }
}

fn build_message(subject: &str, body: &str) -> Result<Message, DeliveryError> {
    let subject = Content::builder().data(subject).build()?;
    let text = Content::builder().data(body).build()?;

    Ok(Message::builder()
        .subject(subject)
        .body(Body::builder().text(text).build())
        .build())
}
