//! Outgoing email with an explicit delivery outcome.
//!
//! Callers never fire and forget: `dispatch` reports whether the message
//! went out, and anything that did not is parked in the outbox for the
//! background worker to retry.

pub mod outbox;
pub mod smtp;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::db::outbox as outbox_db;

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String>;
}

/// Shared handle registered as app data.
pub type Mailer = Arc<dyn EmailSender>;

/// What happened to a message handed to `dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Not delivered; the message now waits in the outbox.
    Queued { reason: String },
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered => "sent",
            DeliveryOutcome::Queued { .. } => "queued",
        }
    }
}

/// Sender used when no SMTP server is configured: writes the message to the log.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        tracing::info!(%to, %subject, %body, "email (smtp not configured)");
        Ok(())
    }
}

/// Subject and body of the verification email.
pub fn otp_message(otp: &str) -> (&'static str, String) {
    (
        "Verify your account - OTP",
        format!("Your OTP for registration is {otp}. It expires in 5 minutes."),
    )
}

/// Try to deliver now; on failure enqueue the message for retry.
///
/// Delivery problems never surface as errors to the caller. If even the
/// enqueue fails the message is lost, which is logged loudly.
pub async fn dispatch(
    db: &DatabaseConnection,
    sender: &dyn EmailSender,
    to: &str,
    subject: &str,
    body: &str,
) -> DeliveryOutcome {
    match sender.send_email(to, subject, body).await {
        Ok(()) => {
            tracing::info!(%to, %subject, "email delivered");
            DeliveryOutcome::Delivered
        }
        Err(reason) => {
            tracing::warn!(%to, %subject, error = %reason, "email delivery failed, queueing for retry");
            if let Err(e) = outbox_db::enqueue(db, to, subject, body, &reason).await {
                tracing::error!(%to, error = %e, "failed to queue undelivered email");
            }
            DeliveryOutcome::Queued { reason }
        }
    }
}
