pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod media;
pub mod models;

pub use db::create_pool;

use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::email::Mailer;
use crate::locks::OwnerLocks;
use crate::media::MediaStore;

/// Shared state registered on every worker's `App`.
///
/// Each handle is created once so all workers share the same pool, lock
/// table, cache connection and mailer.
#[derive(Clone)]
pub struct AppState {
    pub db: web::Data<DatabaseConnection>,
    pub config: web::Data<AppConfig>,
    pub store: web::Data<MediaStore>,
    pub mailer: web::Data<Mailer>,
    pub locks: web::Data<OwnerLocks>,
    pub cache: web::Data<ResponseCache>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: AppConfig,
        store: MediaStore,
        mailer: Mailer,
        cache: ResponseCache,
    ) -> Self {
        Self {
            db: web::Data::new(db),
            config: web::Data::new(config),
            store: web::Data::new(store),
            mailer: web::Data::new(mailer),
            locks: web::Data::new(OwnerLocks::default()),
            cache: web::Data::new(cache),
        }
    }

    /// Register app data, extractor configs and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.db.clone())
            .app_data(self.config.clone())
            .app_data(self.store.clone())
            .app_data(self.mailer.clone())
            .app_data(self.locks.clone())
            .app_data(self.cache.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .app_data(handlers::query_config())
            .service(web::scope("/api").configure(handlers::init_routes));
    }
}
