use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::time::Duration;

use super::Mailer;
use crate::db::outbox as outbox_db;

/// Rows handled per poll.
const BATCH_SIZE: u64 = 20;

/// Retry policy for queued mail.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: i32,
    /// Delay before retry `n` is `n * backoff_step`.
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub fn delay_after(&self, attempts: i32) -> chrono::Duration {
        let secs = self.backoff_step.as_secs() as i64 * i64::from(attempts.max(1));
        chrono::Duration::seconds(secs)
    }
}

/// Retry every due pending message once. Returns how many were delivered.
pub async fn drain_due(
    db: &DatabaseConnection,
    mailer: &Mailer,
    policy: RetryPolicy,
) -> Result<usize, sea_orm::DbErr> {
    let due = outbox_db::due_pending(db, Utc::now(), BATCH_SIZE).await?;
    let mut delivered = 0;

    for message in due {
        let id = message.id;
        match mailer
            .send_email(&message.recipient, &message.subject, &message.body)
            .await
        {
            Ok(()) => {
                outbox_db::mark_delivered(db, message).await?;
                tracing::info!(%id, "queued email delivered");
                delivered += 1;
            }
            Err(reason) => {
                let attempts = message.attempts + 1;
                let gave_up = attempts >= policy.max_attempts;
                let next = Utc::now() + policy.delay_after(attempts);
                outbox_db::record_failure(db, message, &reason, next, gave_up).await?;
                if gave_up {
                    tracing::error!(%id, attempts, error = %reason, "giving up on queued email");
                } else {
                    tracing::warn!(%id, attempts, error = %reason, "queued email retry failed");
                }
            }
        }
    }

    Ok(delivered)
}

/// Poll the outbox forever on `interval`.
pub async fn run_worker(
    db: DatabaseConnection,
    mailer: Mailer,
    policy: RetryPolicy,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(e) = drain_due(&db, &mailer, policy).await {
            tracing::error!(error = %e, "outbox poll failed");
        }
    }
}
