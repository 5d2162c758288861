//! Media placement: which uploads are accepted, where they land, and how
//! superseded files are retired.
//!
//! Every stored path is relative to the storage root and has the shape
//! `<ownerId>/<slot><ext>`, so re-uploading a slot overwrites instead of
//! accumulating files.

pub mod placement;
pub mod storage;
pub mod upload;

use thiserror::Error;
use uuid::Uuid;

pub use placement::{Placement, commit_all, retire_superseded};
pub use storage::{MediaStore, StagedFile};
pub use upload::{UploadForm, read_upload};

/// The call sites that accept files, each with its own content-type set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    ProfileImage,
    BannerImage,
    BannerDocument,
}

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/webp", ".webp"),
];

const DOCUMENT_TYPES: &[(&str, &str)] = &[("application/pdf", ".pdf")];

impl MediaKind {
    fn accepted(self) -> &'static [(&'static str, &'static str)] {
        match self {
            MediaKind::ProfileImage | MediaKind::BannerImage => IMAGE_TYPES,
            MediaKind::BannerDocument => DOCUMENT_TYPES,
        }
    }

    /// Every extension a file of this kind may be stored under.
    pub fn extensions(self) -> impl Iterator<Item = &'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for &(_, ext) in self.accepted() {
            if !seen.contains(&ext) {
                seen.push(ext);
            }
        }
        seen.into_iter()
    }

    fn describe(self) -> &'static str {
        match self {
            MediaKind::ProfileImage | MediaKind::BannerImage => "a JPEG, PNG or WebP image",
            MediaKind::BannerDocument => "a PDF document",
        }
    }

    /// File extension for `content_type`, or a rejection if this call site
    /// does not accept it. The extension comes from the validated type, never
    /// from the client's file name.
    pub fn extension_for(self, field: &str, content_type: &str) -> Result<&'static str, MediaError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.accepted()
            .iter()
            .find(|(mime, _)| *mime == essence)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| MediaError::UnsupportedType {
                field: field.to_string(),
                content_type: essence,
                expected: self.describe(),
            })
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),
    #[error("Only one file may be sent for '{0}'")]
    DuplicateField(String),
    #[error("'{field}' must be {expected} (got {content_type})")]
    UnsupportedType {
        field: String,
        content_type: String,
        expected: &'static str,
    },
    #[error("'{field}' exceeds the {limit} byte upload limit")]
    TooLarge { field: String, limit: usize },
    #[error("'{0}' is empty")]
    Empty(String),
    #[error("'{0}' is required")]
    Missing(String),
    #[error("Malformed multipart body: {0}")]
    Multipart(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// The form field a rejection refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            MediaError::UnexpectedField(f)
            | MediaError::DuplicateField(f)
            | MediaError::Empty(f)
            | MediaError::Missing(f) => Some(f),
            MediaError::UnsupportedType { field, .. } | MediaError::TooLarge { field, .. } => {
                Some(field)
            }
            MediaError::Multipart(_) | MediaError::Io(_) => None,
        }
    }
}

/// Relative destination for a slot's file.
pub fn destination(owner_id: Uuid, slot: &str, ext: &str) -> String {
    format!("{owner_id}/{slot}{ext}")
}

/// Join a stored relative path onto the public media prefix.
pub fn public_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
