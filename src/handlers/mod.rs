pub mod artists;
pub mod projects;
pub mod users;

use actix_web::{HttpRequest, error, web};

use crate::error::ApiError;

/// Malformed JSON bodies answer like any other validation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        error::Error::from(ApiError::invalid("body", err.to_string()))
    })
}

/// Path segments that fail to parse (e.g. a non-UUID id) are validation failures too.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        error::Error::from(ApiError::invalid("id", err.to_string()))
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        error::Error::from(ApiError::invalid("query", err.to_string()))
    })
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── User routes (register/login/OTP are public; the rest need a session) ──
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(users::register))
            .route("/login", web::post().to(users::login))
            .route("/verify-otp", web::post().to(users::verify_otp))
            .route("/resend-otp", web::post().to(users::resend_otp))
            .route("/getDetails", web::get().to(users::get_details))
            .route("/logout", web::post().to(users::logout))
            .route("/change-password", web::post().to(users::change_password)),
    );

    // ── Artist routes (writes need an artist session; listing and detail are public) ──
    cfg.service(
        web::scope("/artist")
            .route("/profile", web::post().to(artists::upsert_personal))
            .route("/profile", web::put().to(artists::upsert_personal))
            .route("/profile", web::get().to(artists::get_personal))
            .route("/professional", web::put().to(artists::upsert_professional))
            .route("/professional", web::get().to(artists::get_professional))
            .route("/upload", web::put().to(artists::upload_photos))
            .route("/upload", web::get().to(artists::get_photos))
            .route("/artistDp", web::post().to(artists::upload_artist_dp))
            .route("/monologue", web::put().to(artists::upsert_monologues))
            .route("/monologue", web::get().to(artists::get_monologues))
            .route("/artists", web::get().to(artists::list_artists))
            .route("/{id}", web::get().to(artists::get_artist)),
    );

    // ── Project routes (listing and detail are public; writes need a director session) ──
    cfg.service(
        web::scope("/project")
            .route("/create", web::post().to(projects::create_project))
            .route("/projects", web::get().to(projects::get_projects))
            .route("/update/{id}", web::put().to(projects::update_project))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}", web::delete().to(projects::delete_project)),
    );
}
