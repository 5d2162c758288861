use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Every upload, profile image or project banner, is capped at 5 MB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Session credentials (JWT + cookie) live for seven days.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Registration OTPs expire five minutes after they are issued.
pub const OTP_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// SMTP credentials; when absent OTP mail is only logged.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    /// Directory every stored media path is relative to.
    pub storage_root: PathBuf,
    /// Public prefix that relative media paths are joined onto at read time.
    pub media_base_url: String,
    /// Secure cookies are required for SameSite=None; disable only for plain-HTTP dev.
    pub secure_cookies: bool,
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub smtp: Option<SmtpConfig>,
    pub outbox_poll_interval: Duration,
    pub outbox_max_attempts: i32,
}

impl AppConfig {
    /// Build the configuration from process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let port = parse_or("PORT", 8080u16)?;

        let smtp = match optional("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: optional("SMTP_PORT")
                    .map(|v| {
                        v.parse().map_err(|_| ConfigError::Invalid {
                            name: "SMTP_PORT",
                            value: v,
                        })
                    })
                    .transpose()?,
                username: optional("SMTP_USERNAME"),
                password: optional("SMTP_PASSWORD"),
                from: required("SMTP_FROM")?,
            }),
            None => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            cors_origin: optional("CORS_ORIGIN"),
            storage_root: optional("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            media_base_url: optional("MEDIA_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}/uploads")),
            secure_cookies: parse_or("SECURE_COOKIES", true)?,
            redis_url: optional("REDIS_URL"),
            cache_ttl: Duration::from_secs(parse_or("CACHE_TTL_ARTISTS", 300u64)?),
            smtp,
            outbox_poll_interval: Duration::from_secs(parse_or("OUTBOX_POLL_SECS", 30u64)?),
            outbox_max_attempts: parse_or("OUTBOX_MAX_ATTEMPTS", 5i32)?,
        })
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
