use crate::error::ApiError;
use crate::models::projects;
use crate::models::users::{self, Roles};

/// Allow the request only for users holding `role`.
pub fn require_role(user: &users::Model, role: Roles) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        let needed = match role {
            Roles::Artist => "artists",
            Roles::Director => "directors",
        };
        Err(ApiError::Forbidden(format!("Only {needed} can do this")))
    }
}

/// Only the director who published a project may change or remove it.
pub fn verify_project_owner(project: &projects::Model, user: &users::Model) -> Result<(), ApiError> {
    if project.created_by == user.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You can only modify projects you created".to_string(),
        ))
    }
}
