use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::media::MediaError;

/// Field name -> human readable messages, as returned in a 400 body.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Every failure a handler can report.
///
/// Client-facing variants carry their message verbatim; server-side variants
/// only ever expose a generic message and are logged in full.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("Artist profile not found. Please complete personal info first.")]
    ProfileNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("User is already verified")]
    AlreadyVerified,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP has expired")]
    ExpiredOtp,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// A validation failure on a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        ApiError::Validation(errors)
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ProfileNotFound => "PROFILE_NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::AlreadyVerified => "ALREADY_VERIFIED",
            ApiError::InvalidOtp => "INVALID_OTP",
            ApiError::ExpiredOtp => "EXPIRED_OTP",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                "SERVER_ERROR"
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        flatten_validation_errors(&errors, "", &mut fields);
        ApiError::Validation(fields)
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Io(e) => ApiError::Storage(e),
            MediaError::Multipart(msg) => ApiError::invalid("files", msg),
            rejected => {
                let field = rejected.field().unwrap_or("files").to_string();
                ApiError::invalid(field, rejected.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::AlreadyVerified
            | ApiError::InvalidOtp
            | ApiError::ExpiredOtp => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::ProfileNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(errors) => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "errors": errors,
            }),
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                serde_json::json!({
                    "error": "Internal server error",
                    "code": self.code(),
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        HttpResponse::build(status).json(body)
    }
}

/// Request bodies are camelCase on the wire; report errors under the same names.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Turn validator's nested error tree into `pastProjects[0].workLink` style keys.
fn flatten_validation_errors(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let field = wire_name(field);
        let key = if prefix.is_empty() {
            field
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(key).or_default();
                for err in list {
                    messages.push(
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
                    );
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation_errors(inner, &key, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation_errors(inner, &format!("{key}[{index}]"), out);
                }
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
