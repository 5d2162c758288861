#![allow(dead_code)]
//! Shared fixtures: an in-memory SQLite database migrated with the real
//! migrator, a temp-dir media store and a mailer that records what it sends.

use async_trait::async_trait;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use casting_backend::AppState;
use casting_backend::cache::ResponseCache;
use casting_backend::config::{AppConfig, MAX_UPLOAD_BYTES};
use casting_backend::db::users::{self as user_db, NewUser};
use casting_backend::email::{EmailSender, Mailer};
use casting_backend::media::MediaStore;
use casting_backend::models::users::{self, Roles};

pub const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";
pub const MEDIA_BASE_URL: &str = "http://localhost:8080/uploads";

pub async fn test_db() -> DatabaseConnection {
    // One connection: every pooled connection to `:memory:` would be its own database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn test_config(storage_root: &Path) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        port: 8080,
        cors_origin: None,
        storage_root: storage_root.to_path_buf(),
        media_base_url: MEDIA_BASE_URL.to_string(),
        secure_cookies: false,
        redis_url: None,
        cache_ttl: Duration::from_secs(60),
        smtp: None,
        outbox_poll_interval: Duration::from_secs(30),
        outbox_max_attempts: 3,
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every message; fails every send when `fail_with` is set.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentEmail>>,
    pub fail_with: Option<String>,
}

impl RecordingMailer {
    pub fn failing(reason: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        if let Some(reason) = &self.fail_with {
            return Err(reason.clone());
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub fn test_store(root: &Path) -> MediaStore {
    MediaStore::new(root, MAX_UPLOAD_BYTES)
}

/// Full application state backed by SQLite and `storage_root`.
pub async fn test_state(storage_root: &Path) -> (AppState, Arc<RecordingMailer>) {
    let db = test_db().await;
    let recorder = Arc::new(RecordingMailer::default());
    let mailer: Mailer = recorder.clone();
    let state = AppState::new(
        db,
        test_config(storage_root),
        test_store(storage_root),
        mailer,
        ResponseCache::disabled(),
    );
    (state, recorder)
}

/// Insert a verified user directly, bypassing registration.
pub async fn insert_user(db: &DatabaseConnection, email: &str, role: Roles) -> users::Model {
    let user = user_db::insert_user(
        db,
        NewUser {
            user_name: "testuser".to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            role,
            otp: "000000".to_string(),
            otp_expiry: Utc::now(),
        },
    )
    .await
    .expect("insert user");
    user_db::mark_verified(db, user).await.expect("verify user")
}

// ── Multipart bodies ──

pub const BOUNDARY: &str = "----casting-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0not-really-a-jpeg";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\nnot-really-a-pdf";
