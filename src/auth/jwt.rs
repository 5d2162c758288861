use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::models::users::Roles;

/// Session token claims.
///
/// `sub` is the user's UUID. `jti` identifies this particular session; it is
/// stored on the user at login so a logout or a newer login revokes it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    pub jti: Option<String>,
    pub role: Option<Roles>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// The session id, if the token carries one.
    pub fn session_id(&self) -> Option<Uuid> {
        self.jti.as_deref().and_then(|j| Uuid::parse_str(j).ok())
    }
}

/// Sign a new HS256 session token for `user_id`, valid for `ttl`.
///
/// Returns the encoded token and the session id embedded as `jti`.
pub fn issue_token(
    user_id: Uuid,
    role: Roles,
    secret: &str,
    ttl: Duration,
) -> Result<(String, Uuid), String> {
    let now = Utc::now().timestamp() as usize;
    let session_id = Uuid::new_v4();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl.as_secs() as usize,
        iat: Some(now),
        jti: Some(session_id.to_string()),
        role: Some(role),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {e}"))?;

    Ok((token, session_id))
}

/// Validate an HS256 session token and return the decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|td| td.claims)
    .map_err(|e| format!("Token validation failed: {e}"))
}
