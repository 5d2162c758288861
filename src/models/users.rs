use std::sync::LazyLock;

use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "director")]
    Director,
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTimeUtc>,
    pub is_verified: bool,
    pub role: Roles,
    /// `jti` of the session credential issued at the last login.
    #[serde(skip_serializing)]
    pub session_token: Option<Uuid>,
    pub artist_profile_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── Validation rules ──

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// At least five ASCII letters/digits with one upper-case, one lower-case and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password.len() >= 5
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit());

    if strong {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password").with_message("Please enter a strong password".into()))
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used by `POST /users/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 5, message = "Username must be at least 5 characters long"))]
    pub user_name: String,
    #[validate(regex(path = *EMAIL_RE, message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
    pub role: Roles,
}

/// Used by `POST /users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Used by `POST /users/verify-otp`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    pub email: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

/// Used by `POST /users/resend-otp`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Used by `POST /users/change-password`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub old_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords must match"))]
    pub confirm_password: String,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: Roles,
    pub is_verified: bool,
    pub artist_profile_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            user_name: m.user_name,
            email: m.email,
            role: m.role,
            is_verified: m.is_verified,
            artist_profile_id: m.artist_profile_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Body returned by a successful login (the token is also set as a cookie).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub role: Roles,
    pub artist_profile_id: Option<Uuid>,
}
