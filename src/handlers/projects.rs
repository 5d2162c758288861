use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::{require_role, verify_project_owner};
use crate::auth::middleware::AuthenticatedUser;
use crate::config::AppConfig;
use crate::db::projects as project_db;
use crate::error::{ApiError, ApiResult};
use crate::locks::OwnerLocks;
use crate::media::{
    MediaKind, MediaStore, Placement, UploadForm, commit_all, read_upload, retire_superseded,
};
use crate::models::projects::{self, CreateProject, ProjectResponse, UpdateProject};
use crate::models::users::Roles;

const BANNER_IMAGE: &str = "bannerImage";
const BANNER_PDF: &str = "bannerPdf";

const BANNER_FIELDS: [(&str, MediaKind); 2] = [
    (BANNER_IMAGE, MediaKind::BannerImage),
    (BANNER_PDF, MediaKind::BannerDocument),
];

fn placed_path<'a>(placed: &'a [Placement], slot: &str) -> Option<&'a str> {
    placed
        .iter()
        .find(|p| p.slot == slot)
        .map(|p| p.path.as_str())
}

fn check_create(form: &UploadForm) -> ApiResult<CreateProject> {
    for field in [BANNER_IMAGE, BANNER_PDF] {
        if !form.files.iter().any(|f| f.slot() == field) {
            return Err(ApiError::invalid(field, format!("{field} is required")));
        }
    }

    let input: CreateProject = form.parse_fields()?;
    input.validate()?;
    input.validate_windows()?;
    Ok(input)
}

fn check_update(form: &UploadForm, mut project: projects::Model) -> ApiResult<projects::Model> {
    let changes: UpdateProject = form.parse_fields()?;
    changes.validate()?;
    changes.apply_to(&mut project)?;
    Ok(project)
}

/// POST /api/project/create — multipart text fields plus bannerImage and bannerPdf.
pub async fn create_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<MediaStore>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Director)?;

    // Banner files live under the project's own directory.
    let project_id = Uuid::new_v4();
    let mut form = match read_upload(payload, store.get_ref(), project_id, &BANNER_FIELDS, true).await {
        Ok(form) => form,
        Err(e) => {
            store.remove_owner_dir_best_effort(project_id).await;
            return Err(e.into());
        }
    };

    let input = match check_create(&form) {
        Ok(input) => input,
        Err(e) => {
            form.discard(store.get_ref()).await;
            store.remove_owner_dir_best_effort(project_id).await;
            return Err(e);
        }
    };

    let placed = match commit_all(store.get_ref(), std::mem::take(&mut form.files)).await {
        Ok(placed) => placed,
        Err(e) => {
            store.remove_slots_best_effort(project_id, &BANNER_FIELDS).await;
            return Err(e.into());
        }
    };
    let (Some(image), Some(pdf)) = (
        placed_path(&placed, BANNER_IMAGE),
        placed_path(&placed, BANNER_PDF),
    ) else {
        store.remove_slots_best_effort(project_id, &BANNER_FIELDS).await;
        return Err(ApiError::Internal("Banner placement incomplete".to_string()));
    };

    let project = match project_db::insert_project(
        db.get_ref(),
        project_id,
        user.id,
        input,
        image.to_string(),
        pdf.to_string(),
    )
    .await
    {
        Ok(project) => project,
        Err(e) => {
            store.remove_slots_best_effort(project_id, &BANNER_FIELDS).await;
            return Err(e.into());
        }
    };
    tracing::info!(project_id = %project.id, created_by = %user.id, "project created");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Project created successfully",
        "project": ProjectResponse::from_model(project, &config.media_base_url),
    })))
}

/// GET /api/project/projects — all projects, newest first.
pub async fn get_projects(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    let projects = project_db::get_all_projects(db.get_ref()).await?;
    let response: Vec<ProjectResponse> = projects
        .into_iter()
        .map(|p| ProjectResponse::from_model(p, &config.media_base_url))
        .collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/project/{id}
pub async fn get_project(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let project = project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id} not found")))?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from_model(project, &config.media_base_url)))
}

/// PUT /api/project/update/{id} — partial update; every part is optional.
///
/// Only banners present in the request replace the stored ones.
pub async fn update_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<MediaStore>,
    locks: web::Data<OwnerLocks>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Director)?;
    let id = path.into_inner();

    let _guard = locks.acquire(id).await;
    let project = project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id} not found")))?;
    verify_project_owner(&project, &user)?;

    let mut form = read_upload(payload, store.get_ref(), id, &BANNER_FIELDS, true).await?;
    let mut merged = match check_update(&form, project) {
        Ok(merged) => merged,
        Err(e) => {
            form.discard(store.get_ref()).await;
            return Err(e);
        }
    };

    let placed = commit_all(store.get_ref(), std::mem::take(&mut form.files)).await?;
    let mut superseded = Vec::new();
    if let Some(path) = placed_path(&placed, BANNER_IMAGE) {
        superseded.push(std::mem::replace(&mut merged.banner_image, path.to_string()));
    }
    if let Some(path) = placed_path(&placed, BANNER_PDF) {
        superseded.push(std::mem::replace(&mut merged.banner_pdf, path.to_string()));
    }

    let project = project_db::save_project(db.get_ref(), merged).await?;
    retire_superseded(store.get_ref(), &superseded, &placed).await;
    tracing::info!(project_id = %id, banners = placed.len(), "project updated");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Project updated successfully",
        "project": ProjectResponse::from_model(project, &config.media_base_url),
    })))
}

/// DELETE /api/project/{id}
pub async fn delete_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    store: web::Data<MediaStore>,
    locks: web::Data<OwnerLocks>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = user.0;
    require_role(&user, Roles::Director)?;
    let id = path.into_inner();

    let _guard = locks.acquire(id).await;
    let project = project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id} not found")))?;
    verify_project_owner(&project, &user)?;

    let result = project_db::delete_project(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Project {id} not found")));
    }

    store.remove_best_effort(&project.banner_image).await;
    store.remove_best_effort(&project.banner_pdf).await;
    store.remove_owner_dir_best_effort(id).await;
    tracing::info!(project_id = %id, "project deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Project {id} deleted"),
    })))
}
