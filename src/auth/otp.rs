use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::ApiError;

/// A fresh six-digit numeric code.
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

/// Check a submitted code against the pending one.
///
/// A wrong code is `InvalidOtp` whatever the clock says; the right code past
/// its expiry is `ExpiredOtp`.
pub fn check_otp(
    pending: Option<&str>,
    expiry: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let pending = pending.ok_or(ApiError::InvalidOtp)?;
    if pending != submitted.trim() {
        return Err(ApiError::InvalidOtp);
    }
    match expiry {
        Some(expiry) if now <= expiry => Ok(()),
        _ => Err(ApiError::ExpiredOtp),
    }
}
