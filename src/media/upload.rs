use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{MediaError, MediaKind, MediaStore, StagedFile};
use crate::error::ApiError;

/// Upper bound on a single text part of a multipart form.
const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

/// A fully received multipart form: text parts plus staged (not yet placed) files.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: Map<String, Value>,
    pub files: Vec<StagedFile>,
}

impl UploadForm {
    /// Deserialize the text parts into a typed request.
    pub fn parse_fields<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| ApiError::invalid("body", e.to_string()))
    }

    /// Drop every staged file still held by the form.
    pub async fn discard(self, store: &MediaStore) {
        for staged in self.files {
            store.discard(staged).await;
        }
    }
}

/// Receive a multipart body, staging files for `owner_id`.
///
/// Only file fields listed in `accepted` are allowed, each at most once,
/// with a content type valid for its kind and within the store's size
/// ceiling. Text parts are collected only when `allow_text` is set. Any
/// violation discards everything staged so far, so nothing is persisted.
pub async fn read_upload(
    mut payload: Multipart,
    store: &MediaStore,
    owner_id: Uuid,
    accepted: &[(&str, MediaKind)],
    allow_text: bool,
) -> Result<UploadForm, MediaError> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let result = match item {
            Ok(field) => receive_field(field, &mut form, store, owner_id, accepted, allow_text).await,
            Err(e) => Err(MediaError::Multipart(e.to_string())),
        };
        if let Err(e) = result {
            form.discard(store).await;
            return Err(e);
        }
    }

    Ok(form)
}

async fn receive_field(
    mut field: Field,
    form: &mut UploadForm,
    store: &MediaStore,
    owner_id: Uuid,
    accepted: &[(&str, MediaKind)],
    allow_text: bool,
) -> Result<(), MediaError> {
    let name = field
        .name()
        .map(str::to_string)
        .ok_or_else(|| MediaError::Multipart("part without a field name".to_string()))?;
    let is_file = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .is_some();

    if !is_file {
        if !allow_text {
            return Err(MediaError::UnexpectedField(name));
        }
        let mut buf = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| MediaError::Multipart(e.to_string()))?;
            if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                return Err(MediaError::TooLarge {
                    field: name,
                    limit: MAX_TEXT_FIELD_BYTES,
                });
            }
            buf.extend_from_slice(&chunk);
        }
        let text = String::from_utf8(buf)
            .map_err(|_| MediaError::Multipart(format!("'{name}' is not valid UTF-8")))?;
        form.fields.insert(name, Value::String(text));
        return Ok(());
    }

    let kind = accepted
        .iter()
        .find(|(slot, _)| *slot == name)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| MediaError::UnexpectedField(name.clone()))?;
    if form.files.iter().any(|f| f.slot() == name) {
        return Err(MediaError::DuplicateField(name));
    }

    let content_type = field
        .content_type()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default();
    let mut staged = store.stage(owner_id, &name, kind, &content_type).await?;

    let written = async {
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| MediaError::Multipart(e.to_string()))?;
            staged.write_chunk(&chunk).await?;
        }
        staged.finish().await
    }
    .await;

    match written {
        Ok(()) => {
            tracing::debug!(field = %name, bytes = staged.size(), "staged upload");
            form.files.push(staged);
            Ok(())
        }
        Err(e) => {
            store.discard(staged).await;
            Err(e)
        }
    }
}
