use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::outbox::{self, OutboxStatus};

/// Park an undelivered message. The failed first attempt counts as attempt one.
pub async fn enqueue(
    db: &DatabaseConnection,
    recipient: &str,
    subject: &str,
    body: &str,
    reason: &str,
) -> Result<outbox::Model, DbErr> {
    let now = Utc::now();
    let row = outbox::ActiveModel {
        id: Set(Uuid::new_v4()),
        recipient: Set(recipient.to_string()),
        subject: Set(subject.to_string()),
        body: Set(body.to_string()),
        status: Set(OutboxStatus::Pending),
        attempts: Set(1),
        last_error: Set(Some(reason.to_string())),
        next_attempt_at: Set(now),
        created_at: Set(now),
        updated_at: Set(None),
    };

    row.insert(db).await
}

/// Pending messages whose next attempt is due, oldest first.
pub async fn due_pending(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<outbox::Model>, DbErr> {
    outbox::Entity::find()
        .filter(outbox::Column::Status.eq(OutboxStatus::Pending))
        .filter(outbox::Column::NextAttemptAt.lte(now))
        .order_by_asc(outbox::Column::NextAttemptAt)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch every message sent to `recipient`, newest first.
pub async fn find_by_recipient(
    db: &DatabaseConnection,
    recipient: &str,
) -> Result<Vec<outbox::Model>, DbErr> {
    outbox::Entity::find()
        .filter(outbox::Column::Recipient.eq(recipient))
        .order_by_desc(outbox::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn mark_delivered(
    db: &DatabaseConnection,
    message: outbox::Model,
) -> Result<outbox::Model, DbErr> {
    let attempts = message.attempts + 1;
    let mut active: outbox::ActiveModel = message.into();
    active.status = Set(OutboxStatus::Delivered);
    active.attempts = Set(attempts);
    active.last_error = Set(None);
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Count a failed retry; past the attempt budget the row is marked failed.
pub async fn record_failure(
    db: &DatabaseConnection,
    message: outbox::Model,
    reason: &str,
    next_attempt_at: DateTime<Utc>,
    give_up: bool,
) -> Result<outbox::Model, DbErr> {
    let attempts = message.attempts + 1;
    let mut active: outbox::ActiveModel = message.into();
    active.attempts = Set(attempts);
    active.last_error = Set(Some(reason.to_string()));
    active.next_attempt_at = Set(next_attempt_at);
    if give_up {
        active.status = Set(OutboxStatus::Failed);
    }
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}
