use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer};
use casting_backend::cache::{RedisCache, ResponseCache};
use casting_backend::config::{AppConfig, MAX_UPLOAD_BYTES};
use casting_backend::email::outbox::{self, RetryPolicy};
use casting_backend::email::smtp::SmtpEmailSender;
use casting_backend::email::{LogEmailSender, Mailer};
use casting_backend::media::MediaStore;
use casting_backend::{AppState, create_pool};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {e}")))?;
    tracing::info!("Database connected and migrated");

    let store = MediaStore::new(config.storage_root.clone(), MAX_UPLOAD_BYTES);
    store.init().await?;
    tracing::info!(root = %store.root().display(), "Media storage ready");

    // Redis is optional; without it public artist reads go straight to the database.
    let cache = match &config.redis_url {
        Some(redis_url) => match RedisCache::new(redis_url).await {
            Ok(redis) => {
                tracing::info!("Connected to Redis");
                ResponseCache::new(redis, config.cache_ttl)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, response cache disabled");
                ResponseCache::disabled()
            }
        },
        None => ResponseCache::disabled(),
    };

    let mailer: Mailer = match &config.smtp {
        Some(smtp) => Arc::new(SmtpEmailSender::from_config(smtp).map_err(io::Error::other)?),
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogEmailSender)
        }
    };

    let policy = RetryPolicy {
        max_attempts: config.outbox_max_attempts,
        backoff_step: Duration::from_secs(60),
    };
    actix_web::rt::spawn(outbox::run_worker(
        db.clone(),
        mailer.clone(),
        policy,
        config.outbox_poll_interval,
    ));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let cors_origin = config.cors_origin.clone();
    let storage_root = store.root().to_path_buf();
    let state = AppState::new(db, config, store, mailer, cache);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600);

        let state = state.clone();
        App::new()
            .wrap(cors)
            .configure(move |cfg| state.configure(cfg))
            .service(Files::new("/uploads", storage_root.clone()))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
