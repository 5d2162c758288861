use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use validator::Validate;

use crate::auth::middleware::{AuthenticatedUser, SESSION_COOKIE, authenticate, session_token};
use crate::auth::{jwt, otp, password};
use crate::config::{AppConfig, OTP_TTL, SESSION_TTL};
use crate::db::users::{self as user_db, NewUser};
use crate::email::{self, Mailer};
use crate::error::{ApiError, ApiResult};
use crate::models::users::{
    ChangePassword, LoginRequest, LoginResponse, RegisterUser, ResendOtpRequest, UserResponse,
    VerifyOtpRequest,
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn otp_expiry() -> chrono::DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(OTP_TTL.as_secs() as i64)
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(SESSION_TTL.as_secs() as i64))
        .finish()
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// POST /api/users/register — create an unverified account and mail its OTP.
pub async fn register(
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
    body: web::Json<RegisterUser>,
) -> ApiResult<HttpResponse> {
    let input = body.into_inner();
    input.validate()?;
    let email = normalize_email(&input.email);

    if user_db::get_user_by_email(db.get_ref(), &email).await?.is_some() {
        return Err(ApiError::Conflict("User with this email already exists".to_string()));
    }

    let password_hash = password::hash_password(&input.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;
    let code = otp::generate_otp();

    let new_user = NewUser {
        user_name: input.user_name.trim().to_string(),
        email: email.clone(),
        password_hash,
        role: input.role,
        otp: code.clone(),
        otp_expiry: otp_expiry(),
    };
    let user = match user_db::insert_user(db.get_ref(), new_user).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration for the same address.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict("User with this email already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %user.id, role = ?user.role, "user registered");

    let (subject, text) = email::otp_message(&code);
    let delivery = email::dispatch(db.get_ref(), mailer.get_ref().as_ref(), &email, subject, &text).await;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully",
        "user": UserResponse::from(user),
        "otpDelivery": delivery.as_str(),
    })))
}

/// POST /api/users/resend-otp — issue a fresh code for an unverified account.
pub async fn resend_otp(
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
    body: web::Json<ResendOtpRequest>,
) -> ApiResult<HttpResponse> {
    let email = normalize_email(&body.email);
    let user = user_db::get_user_by_email(db.get_ref(), &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    if user.is_verified {
        return Err(ApiError::AlreadyVerified);
    }

    let code = otp::generate_otp();
    user_db::set_otp(db.get_ref(), user, code.clone(), otp_expiry()).await?;

    let (subject, text) = email::otp_message(&code);
    let delivery = email::dispatch(db.get_ref(), mailer.get_ref().as_ref(), &email, subject, &text).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "OTP sent",
        "otpDelivery": delivery.as_str(),
    })))
}

/// POST /api/users/verify-otp
pub async fn verify_otp(
    db: web::Data<DatabaseConnection>,
    body: web::Json<VerifyOtpRequest>,
) -> ApiResult<HttpResponse> {
    let input = body.into_inner();
    input.validate()?;

    let user = user_db::get_user_by_email(db.get_ref(), &normalize_email(&input.email))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    if user.is_verified {
        return Err(ApiError::AlreadyVerified);
    }

    otp::check_otp(user.otp.as_deref(), user.otp_expiry, &input.otp, Utc::now())?;
    let user = user_db::mark_verified(db.get_ref(), user).await?;
    tracing::info!(user_id = %user.id, "email verified");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Email verified successfully",
    })))
}

/// POST /api/users/login — start a new session, revoking the previous one.
pub async fn login(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let input = body.into_inner();
    let user = user_db::get_user_by_email(db.get_ref(), &normalize_email(&input.email))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let matches = password::verify_password(&input.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Stored password hash unusable: {e}")))?;
    if !matches {
        return Err(ApiError::InvalidCredentials);
    }

    let (token, session_id) = jwt::issue_token(user.id, user.role, &config.jwt_secret, SESSION_TTL)
        .map_err(ApiError::Internal)?;
    user_db::set_session(db.get_ref(), user.id, Some(session_id)).await?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token.clone(), config.secure_cookies))
        .json(LoginResponse {
            message: "Login successful",
            token,
            role: user.role,
            artist_profile_id: user.artist_profile_id,
        }))
}

/// GET /api/users/getDetails
pub async fn get_details(user: AuthenticatedUser) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.0)))
}

/// POST /api/users/logout — always clears the cookie; revokes the session if one is presented.
pub async fn logout(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    if let Some(token) = session_token(&req) {
        match authenticate(db.get_ref(), config.get_ref(), &token).await {
            Ok(user) => {
                if let Err(e) = user_db::set_session(db.get_ref(), user.id, None).await {
                    tracing::warn!(user_id = %user.id, error = %e, "failed to revoke session");
                } else {
                    tracing::info!(user_id = %user.id, "user logged out");
                }
            }
            Err(e) => tracing::debug!(error = %e, "logout without a live session"),
        }
    }

    let mut cookie = session_cookie(String::new(), config.secure_cookies);
    cookie.make_removal();

    Ok(HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "message": "Logged out successfully",
    })))
}

/// POST /api/users/change-password
pub async fn change_password(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<ChangePassword>,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    let input = body.into_inner();
    input.validate()?;

    let matches = password::verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Stored password hash unusable: {e}")))?;
    if !matches {
        return Err(ApiError::InvalidCredentials);
    }

    let password_hash = password::hash_password(&input.new_password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;
    let user = user_db::update_password(db.get_ref(), user, password_hash).await?;
    tracing::info!(user_id = %user.id, "password changed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password changed successfully",
    })))
}
