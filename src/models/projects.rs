use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, FieldErrors};
use crate::media::public_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ProjectType {
    #[sea_orm(string_value = "film")]
    #[serde(rename = "film")]
    Film,
    #[sea_orm(string_value = "ad")]
    #[serde(rename = "ad")]
    Ad,
    #[sea_orm(string_value = "web-series")]
    #[serde(rename = "web-series")]
    WebSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CastingGender {
    #[sea_orm(string_value = "Male")]
    Male,
    #[sea_orm(string_value = "Female")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AgeRange {
    #[sea_orm(string_value = "18-25")]
    #[serde(rename = "18-25")]
    From18To25,
    #[sea_orm(string_value = "26-40")]
    #[serde(rename = "26-40")]
    From26To40,
}

/// SeaORM entity for the `projects` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The director who published the project.
    pub created_by: Uuid,
    pub project_name: String,
    pub type_of_project: ProjectType,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub casting_start: Date,
    pub casting_end: Date,
    pub casting_city: String,
    pub casting_state: String,
    pub casting_country: String,
    pub shooting_start: Date,
    pub shooting_end: Date,
    pub shooting_city: String,
    pub shooting_state: String,
    pub shooting_country: String,
    pub role: String,
    pub gender: CastingGender,
    pub age_range: AgeRange,
    pub language: String,
    /// Relative storage path of the banner image.
    #[sea_orm(column_type = "Text")]
    pub banner_image: String,
    /// Relative storage path of the banner PDF.
    #[sea_orm(column_type = "Text")]
    pub banner_pdf: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Reject windows that end before they start. Equal dates are a one-day window.
pub fn validate_windows(
    casting_start: NaiveDate,
    casting_end: NaiveDate,
    shooting_start: NaiveDate,
    shooting_end: NaiveDate,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if casting_end < casting_start {
        errors.insert(
            "castingEnd".to_string(),
            vec!["Casting end date must be after casting start date".to_string()],
        );
    }
    if shooting_end < shooting_start {
        errors.insert(
            "shootingEnd".to_string(),
            vec!["Shooting end date must be after shooting start date".to_string()],
        );
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

// ── DTOs ──

/// Text parts of `POST /project/create`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub project_name: String,
    pub type_of_project: ProjectType,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub casting_start: NaiveDate,
    pub casting_end: NaiveDate,
    #[validate(length(min = 1, message = "Casting city is required"))]
    pub casting_city: String,
    #[validate(length(min = 1, message = "Casting state is required"))]
    pub casting_state: String,
    #[validate(length(min = 1, message = "Casting country is required"))]
    pub casting_country: String,
    pub shooting_start: NaiveDate,
    pub shooting_end: NaiveDate,
    #[validate(length(min = 1, message = "Shooting city is required"))]
    pub shooting_city: String,
    #[validate(length(min = 1, message = "Shooting state is required"))]
    pub shooting_state: String,
    #[validate(length(min = 1, message = "Shooting country is required"))]
    pub shooting_country: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    pub gender: CastingGender,
    pub age_range: AgeRange,
    #[validate(length(min = 1, message = "Language is required"))]
    pub language: String,
}

impl CreateProject {
    pub fn validate_windows(&self) -> Result<(), ApiError> {
        validate_windows(
            self.casting_start,
            self.casting_end,
            self.shooting_start,
            self.shooting_end,
        )
    }
}

/// Text parts of `PUT /project/update/{id}`; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub project_name: Option<String>,
    pub type_of_project: Option<ProjectType>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub casting_start: Option<NaiveDate>,
    pub casting_end: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Casting city cannot be empty"))]
    pub casting_city: Option<String>,
    #[validate(length(min = 1, message = "Casting state cannot be empty"))]
    pub casting_state: Option<String>,
    #[validate(length(min = 1, message = "Casting country cannot be empty"))]
    pub casting_country: Option<String>,
    pub shooting_start: Option<NaiveDate>,
    pub shooting_end: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Shooting city cannot be empty"))]
    pub shooting_city: Option<String>,
    #[validate(length(min = 1, message = "Shooting state cannot be empty"))]
    pub shooting_state: Option<String>,
    #[validate(length(min = 1, message = "Shooting country cannot be empty"))]
    pub shooting_country: Option<String>,
    #[validate(length(min = 1, message = "Role cannot be empty"))]
    pub role: Option<String>,
    pub gender: Option<CastingGender>,
    pub age_range: Option<AgeRange>,
    #[validate(length(min = 1, message = "Language cannot be empty"))]
    pub language: Option<String>,
}

impl UpdateProject {
    /// Overlay the supplied fields on `project`, then re-check date ordering
    /// against the merged result.
    pub fn apply_to(self, project: &mut Model) -> Result<(), ApiError> {
        macro_rules! overlay {
            ($src:ident => $($field:ident),* $(,)?) => {
                $(if let Some(value) = $src.$field {
                    project.$field = value;
                })*
            };
        }
        let changes = self;
        overlay!(changes =>
            project_name,
            type_of_project,
            description,
            casting_start,
            casting_end,
            casting_city,
            casting_state,
            casting_country,
            shooting_start,
            shooting_end,
            shooting_city,
            shooting_state,
            shooting_country,
            role,
            gender,
            age_range,
            language,
        );
        validate_windows(
            project.casting_start,
            project.casting_end,
            project.shooting_start,
            project.shooting_end,
        )
    }
}

/// A project with media paths resolved to URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub created_by: Uuid,
    pub project_name: String,
    pub type_of_project: ProjectType,
    pub description: String,
    pub casting_start: NaiveDate,
    pub casting_end: NaiveDate,
    pub casting_city: String,
    pub casting_state: String,
    pub casting_country: String,
    pub shooting_start: NaiveDate,
    pub shooting_end: NaiveDate,
    pub shooting_city: String,
    pub shooting_state: String,
    pub shooting_country: String,
    pub role: String,
    pub gender: CastingGender,
    pub age_range: AgeRange,
    pub language: String,
    pub banner_image: String,
    pub banner_pdf: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl ProjectResponse {
    pub fn from_model(m: Model, base_url: &str) -> Self {
        Self {
            id: m.id,
            created_by: m.created_by,
            project_name: m.project_name,
            type_of_project: m.type_of_project,
            description: m.description,
            casting_start: m.casting_start,
            casting_end: m.casting_end,
            casting_city: m.casting_city,
            casting_state: m.casting_state,
            casting_country: m.casting_country,
            shooting_start: m.shooting_start,
            shooting_end: m.shooting_end,
            shooting_city: m.shooting_city,
            shooting_state: m.shooting_state,
            shooting_country: m.shooting_country,
            role: m.role,
            gender: m.gender,
            age_range: m.age_range,
            language: m.language,
            banner_image: public_url(base_url, &m.banner_image),
            banner_pdf: public_url(base_url, &m.banner_pdf),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
