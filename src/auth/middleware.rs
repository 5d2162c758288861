use actix_web::FromRequest;
use actix_web::http::header::Header;
use actix_web::{HttpRequest, dev::Payload, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::config::AppConfig;
use crate::db::users::get_user_by_id;
use crate::error::ApiError;
use crate::models::users;

/// Name of the HTTP-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// The session token presented by a request: the cookie first, then a
/// `Authorization: Bearer` header.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    Authorization::<Bearer>::parse(req)
        .ok()
        .map(|auth| auth.into_scheme().token().to_string())
}

/// Resolve a session token to its user, failing closed on anything off.
pub async fn authenticate(
    db: &DatabaseConnection,
    config: &AppConfig,
    token: &str,
) -> Result<users::Model, ApiError> {
    let claims = jwt::validate_token(token, &config.jwt_secret).map_err(|e| {
        tracing::debug!(error = %e, "rejected session token");
        ApiError::Unauthorized("Invalid or expired session".to_string())
    })?;

    let user_id = claims.user_id().map_err(ApiError::Unauthorized)?;
    let session_id = claims
        .session_id()
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    let user = get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    // Logout and every newer login replace the stored session id.
    if user.session_token != Some(session_id) {
        return Err(ApiError::Unauthorized("Session has been revoked".to_string()));
    }

    Ok(user)
}

/// Extractor for handlers that require a logged-in user.
pub struct AuthenticatedUser(pub users::Model);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Pull the token from the cookie or the Authorization header.
            let token = session_token(&req)
                .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

            // 2. Shared state.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Internal("Database not configured".to_string()))?;
            let config = req
                .app_data::<web::Data<AppConfig>>()
                .ok_or_else(|| ApiError::Internal("Configuration not registered".to_string()))?;

            // 3. Validate and load the user.
            let user = authenticate(db.get_ref(), config.get_ref(), &token).await?;
            Ok(AuthenticatedUser(user))
        })
    }
}
