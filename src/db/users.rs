use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, Roles};

/// Everything `register` stores for a new, unverified account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Roles,
    pub otp: String,
    pub otp_expiry: DateTime<Utc>,
}

/// Insert a new unverified user.
pub async fn insert_user(db: &DatabaseConnection, input: NewUser) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_name: Set(input.user_name),
        email: Set(input.email),
        password_hash: Set(input.password_hash),
        otp: Set(Some(input.otp)),
        otp_expiry: Set(Some(input.otp_expiry)),
        is_verified: Set(false),
        role: Set(input.role),
        session_token: Set(None),
        artist_profile_id: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch a single user by (normalised) email.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Replace the pending OTP with a fresh one.
pub async fn set_otp(
    db: &DatabaseConnection,
    user: users::Model,
    otp: String,
    expiry: DateTime<Utc>,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.otp = Set(Some(otp));
    active.otp_expiry = Set(Some(expiry));
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Mark the email verified and clear the OTP fields.
pub async fn mark_verified(
    db: &DatabaseConnection,
    user: users::Model,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.is_verified = Set(true);
    active.otp = Set(None);
    active.otp_expiry = Set(None);
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Record the session id of a freshly issued token, revoking any older one.
pub async fn set_session(
    db: &DatabaseConnection,
    id: Uuid,
    session_id: Option<Uuid>,
) -> Result<UpdateResult, DbErr> {
    users::Entity::update_many()
        .col_expr(users::Column::SessionToken, Expr::value(session_id))
        .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
        .filter(users::Column::Id.eq(id))
        .exec(db)
        .await
}

pub async fn update_password(
    db: &DatabaseConnection,
    user: users::Model,
    password_hash: String,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Remember which profile belongs to the user. Weak link, no cascade.
pub async fn link_artist_profile(
    db: &DatabaseConnection,
    id: Uuid,
    profile_id: Uuid,
) -> Result<UpdateResult, DbErr> {
    users::Entity::update_many()
        .col_expr(users::Column::ArtistProfileId, Expr::value(Some(profile_id)))
        .filter(users::Column::Id.eq(id))
        .filter(users::Column::ArtistProfileId.is_null())
        .exec(db)
        .await
}
