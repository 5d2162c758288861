use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::projects::{self, CreateProject};

/// Insert a new project whose banner files are already in place.
pub async fn insert_project(
    db: &DatabaseConnection,
    id: Uuid,
    created_by: Uuid,
    input: CreateProject,
    banner_image: String,
    banner_pdf: String,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        id: Set(id),
        created_by: Set(created_by),
        project_name: Set(input.project_name),
        type_of_project: Set(input.type_of_project),
        description: Set(input.description),
        casting_start: Set(input.casting_start),
        casting_end: Set(input.casting_end),
        casting_city: Set(input.casting_city),
        casting_state: Set(input.casting_state),
        casting_country: Set(input.casting_country),
        shooting_start: Set(input.shooting_start),
        shooting_end: Set(input.shooting_end),
        shooting_city: Set(input.shooting_city),
        shooting_state: Set(input.shooting_state),
        shooting_country: Set(input.shooting_country),
        role: Set(input.role),
        gender: Set(input.gender),
        age_range: Set(input.age_range),
        language: Set(input.language),
        banner_image: Set(banner_image),
        banner_pdf: Set(banner_pdf),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };

    new_project.insert(db).await
}

/// Fetch all projects, newest first.
pub async fn get_all_projects(db: &DatabaseConnection) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .order_by_desc(projects::Column::CreatedAt)
        .order_by_desc(projects::Column::Id)
        .all(db)
        .await
}

/// Fetch a single project by ID.
pub async fn get_project_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// Write back a project after its fields and media paths were merged.
pub async fn save_project(
    db: &DatabaseConnection,
    project: projects::Model,
) -> Result<projects::Model, DbErr> {
    let mut active = projects::ActiveModel::from(project).reset_all();
    active.updated_at = Set(Some(Utc::now()));
    active.update(db).await
}

/// Delete a project by ID.
pub async fn delete_project(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    projects::Entity::delete_by_id(id).exec(db).await
}
