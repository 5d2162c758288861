use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{ResponseCache, keys};
use crate::config::AppConfig;
use crate::db::artists as artist_db;
use crate::error::{ApiError, ApiResult};
use crate::locks::OwnerLocks;
use crate::media::{MediaKind, MediaStore, StagedFile, commit_all, read_upload, retire_superseded};
use crate::models::PaginationQuery;
use crate::models::artists::{
    self, ArtistDetail, ArtistSummary, MonologueLinks, PersonalInfo, PersonalResponse, PhotoSlot,
    ProfessionalInfo, ProfessionalResponse,
};
use crate::models::users::Roles;

/// POST|PUT /api/artist/profile — create the profile if needed and store personal info.
pub async fn upsert_personal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    locks: web::Data<OwnerLocks>,
    cache: web::Data<ResponseCache>,
    body: web::Json<PersonalInfo>,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Artist)?;
    let input = body.into_inner();
    input.validate()?;

    let _guard = locks.acquire(user.id).await;
    let (mut profile, created) = artist_db::ensure_profile(db.get_ref(), user.id, &user.email).await?;
    input.apply_to(&mut profile);
    let profile = artist_db::save_profile(db.get_ref(), profile).await?;
    cache.invalidate_artist(profile.id).await;

    let body = serde_json::json!({
        "message": if created {
            "Artist profile created successfully"
        } else {
            "Artist profile updated successfully"
        },
        "profile": PersonalResponse::from(&profile),
    });
    Ok(if created {
        HttpResponse::Created().json(body)
    } else {
        HttpResponse::Ok().json(body)
    })
}

/// PUT /api/artist/professional
pub async fn upsert_professional(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    locks: web::Data<OwnerLocks>,
    cache: web::Data<ResponseCache>,
    body: web::Json<ProfessionalInfo>,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Artist)?;
    let input = body.into_inner();
    input.validate()?;

    let _guard = locks.acquire(user.id).await;
    let mut profile = artist_db::get_profile_by_owner(db.get_ref(), user.id)
        .await?
        .filter(artists::Model::has_personal_info)
        .ok_or(ApiError::ProfileNotFound)?;
    input.apply_to(&mut profile);
    let profile = artist_db::save_profile(db.get_ref(), profile).await?;
    cache.invalidate_artist(profile.id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Professional profile updated successfully",
        "professional": ProfessionalResponse::from(&profile),
    })))
}

/// Place uploaded photos into their slots and repoint the profile at them.
///
/// Runs under the owner's lock: files are moved into place first, then the
/// mapping is written, then files the mapping stopped naming are deleted.
/// Slots without a new file keep their current path.
async fn store_photos(
    db: &DatabaseConnection,
    store: &MediaStore,
    locks: &OwnerLocks,
    cache: &ResponseCache,
    owner_id: Uuid,
    files: Vec<StagedFile>,
) -> ApiResult<artists::Model> {
    let _guard = locks.acquire(owner_id).await;
    let profile = match artist_db::get_profile_by_owner(db, owner_id).await {
        Ok(Some(profile)) => profile,
        other => {
            for staged in files {
                store.discard(staged).await;
            }
            return Err(other.err().map(ApiError::from).unwrap_or(ApiError::ProfileNotFound));
        }
    };

    let placed = commit_all(store, files).await?;
    let mut photos = profile.photos.clone();
    let mut superseded = Vec::new();
    for placement in &placed {
        let slot = PhotoSlot::from_field_name(&placement.slot)
            .ok_or_else(|| ApiError::Internal(format!("Unknown photo slot {}", placement.slot)))?;
        if let Some(old) = photos.replace(slot, placement.path.clone()) {
            superseded.push(old);
        }
    }

    let profile = artist_db::update_photos(db, profile, photos).await?;
    retire_superseded(store, &superseded, &placed).await;
    cache.invalidate_artist(profile.id).await;
    tracing::info!(%owner_id, slots = placed.len(), "profile photos stored");

    Ok(profile)
}

/// PUT /api/artist/upload — any subset of the five gallery slots.
pub async fn upload_photos(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<MediaStore>,
    locks: web::Data<OwnerLocks>,
    cache: web::Data<ResponseCache>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Artist)?;

    let accepted: Vec<(&str, MediaKind)> = PhotoSlot::GALLERY
        .iter()
        .map(|slot| (slot.field_name(), MediaKind::ProfileImage))
        .collect();
    let form = read_upload(payload, store.get_ref(), user.id, &accepted, false).await?;
    if form.files.is_empty() {
        return Err(ApiError::invalid("files", "Upload at least one photo"));
    }

    let profile = store_photos(
        db.get_ref(),
        store.get_ref(),
        locks.get_ref(),
        cache.get_ref(),
        user.id,
        form.files,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Profile images uploaded successfully",
        "photos": profile.photos.resolve(&config.media_base_url),
    })))
}

/// POST /api/artist/artistDp — the display picture slot.
pub async fn upload_artist_dp(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<MediaStore>,
    locks: web::Data<OwnerLocks>,
    cache: web::Data<ResponseCache>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Artist)?;

    let field = PhotoSlot::ArtistDp.field_name();
    let form = read_upload(
        payload,
        store.get_ref(),
        user.id,
        &[(field, MediaKind::ProfileImage)],
        false,
    )
    .await?;
    if form.files.is_empty() {
        return Err(ApiError::invalid(field, "Profile picture is required"));
    }

    let profile = store_photos(
        db.get_ref(),
        store.get_ref(),
        locks.get_ref(),
        cache.get_ref(),
        user.id,
        form.files,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Profile picture uploaded successfully",
        "artistDp": profile.photos.resolve(&config.media_base_url).artist_dp,
    })))
}

/// PUT /api/artist/monologue — replaces the whole monologue set.
pub async fn upsert_monologues(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    locks: web::Data<OwnerLocks>,
    cache: web::Data<ResponseCache>,
    body: web::Json<MonologueLinks>,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Artist)?;
    let links = body.into_inner().without_blanks();
    links.validate()?;

    let _guard = locks.acquire(user.id).await;
    let profile = artist_db::get_profile_by_owner(db.get_ref(), user.id)
        .await?
        .ok_or(ApiError::ProfileNotFound)?;
    let profile = artist_db::update_monologues(db.get_ref(), profile, links.into_monologues()).await?;
    cache.invalidate_artist(profile.id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Monologues updated successfully",
        "monologues": profile.monologues.0,
    })))
}

async fn own_profile(db: &DatabaseConnection, owner_id: Uuid) -> ApiResult<artists::Model> {
    artist_db::get_profile_by_owner(db, owner_id)
        .await?
        .ok_or(ApiError::ProfileNotFound)
}

/// GET /api/artist/profile
pub async fn get_personal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let profile = own_profile(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(PersonalResponse::from(&profile)))
}

/// GET /api/artist/professional
pub async fn get_professional(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let profile = own_profile(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(ProfessionalResponse::from(&profile)))
}

/// GET /api/artist/upload
pub async fn get_photos(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    let profile = own_profile(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "photos": profile.photos.resolve(&config.media_base_url),
    })))
}

/// GET /api/artist/monologue
pub async fn get_monologues(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let profile = own_profile(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "monologues": profile.monologues.0,
    })))
}

/// GET /api/artist/artists — public listing, newest first.
/// Query params: ?page=1&limit=20
pub async fn list_artists(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<ResponseCache>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let page = query.page();
    let limit = query.limit();
    let cache_key = keys::artist_list(page, limit);

    if let Some(cached) = cache.get::<Vec<ArtistSummary>>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let profiles = artist_db::get_profiles_paginated(db.get_ref(), page, limit).await?;
    let response: Vec<ArtistSummary> = profiles
        .iter()
        .map(|p| ArtistSummary::from_model(p, &config.media_base_url))
        .collect();
    cache.put(&cache_key, &response).await;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/artist/{id} — public profile by profile ID.
pub async fn get_artist(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<ResponseCache>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let cache_key = keys::artist(id);

    if let Some(cached) = cache.get::<ArtistDetail>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let profile = artist_db::get_profile_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artist not found".to_string()))?;
    let response = ArtistDetail::from_model(&profile, &config.media_base_url);
    cache.put(&cache_key, &response).await;

    Ok(HttpResponse::Ok().json(response))
}
