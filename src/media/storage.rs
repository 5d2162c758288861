use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::{MediaError, MediaKind, destination};

/// Local-disk media storage rooted at a configured directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_file_bytes: usize,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    /// Create the storage root if it does not exist yet.
    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Open a staging file next to the slot's final location so the later
    /// rename stays on one filesystem.
    pub async fn stage(
        &self,
        owner_id: Uuid,
        slot: &str,
        kind: MediaKind,
        content_type: &str,
    ) -> Result<StagedFile, MediaError> {
        let ext = kind.extension_for(slot, content_type)?;
        let dir = self.root.join(owner_id.to_string());
        fs::create_dir_all(&dir).await?;

        let temp_path = dir.join(format!(".{slot}.{}.part", Uuid::new_v4()));
        let file = File::create(&temp_path).await?;

        Ok(StagedFile {
            slot: slot.to_string(),
            destination: destination(owner_id, slot, ext),
            temp_path,
            file: Some(file),
            size: 0,
            limit: self.max_file_bytes,
        })
    }

    /// Move a finished staged file onto its destination, replacing whatever
    /// was there. Returns the relative path now holding the data.
    pub async fn commit(&self, mut staged: StagedFile) -> Result<String, MediaError> {
        if let Some(file) = staged.file.take() {
            file.sync_all().await?;
        }
        let target = self.absolute(&staged.destination);
        if let Err(e) = fs::rename(&staged.temp_path, &target).await {
            let _ = fs::remove_file(&staged.temp_path).await;
            return Err(e.into());
        }
        Ok(staged.destination)
    }

    /// Throw a staged file away.
    pub async fn discard(&self, mut staged: StagedFile) {
        staged.file.take();
        if let Err(e) = fs::remove_file(&staged.temp_path).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %staged.temp_path.display(), error = %e, "failed to discard staged upload");
            }
        }
    }

    /// Delete a stored file. Failures are logged and swallowed: by the time
    /// this runs the record no longer references the file.
    pub async fn remove_best_effort(&self, relative: &str) {
        let path = self.absolute(relative);
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "removed superseded file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove superseded file")
            }
        }
    }

    /// Delete whatever an owner's slots hold, under any extension the slot
    /// accepts, then the owner's directory. Used when no record ends up
    /// pointing at the files.
    pub async fn remove_slots_best_effort(&self, owner_id: Uuid, slots: &[(&str, MediaKind)]) {
        for &(slot, kind) in slots {
            for ext in kind.extensions() {
                self.remove_best_effort(&destination(owner_id, slot, ext)).await;
            }
        }
        self.remove_owner_dir_best_effort(owner_id).await;
    }

    /// Remove an owner's directory once it holds nothing. Best effort.
    pub async fn remove_owner_dir_best_effort(&self, owner_id: Uuid) {
        let dir = self.root.join(owner_id.to_string());
        if let Err(e) = fs::remove_dir(&dir).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %dir.display(), error = %e, "owner directory left in place");
            }
        }
    }
}

/// An upload being written to a temporary file.
#[derive(Debug)]
pub struct StagedFile {
    slot: String,
    destination: String,
    temp_path: PathBuf,
    file: Option<File>,
    size: usize,
    limit: usize,
}

impl StagedFile {
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Append a chunk, enforcing the per-file ceiling as bytes arrive.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), MediaError> {
        if self.size + chunk.len() > self.limit {
            return Err(MediaError::TooLarge {
                field: self.slot.clone(),
                limit: self.limit,
            });
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("staged file already closed"))?;
        file.write_all(chunk).await?;
        self.size += chunk.len();
        Ok(())
    }

    /// Flush buffered data; an empty upload is rejected.
    pub async fn finish(&mut self) -> Result<(), MediaError> {
        if self.size == 0 {
            return Err(MediaError::Empty(self.slot.clone()));
        }
        if let Some(file) = self.file.as_mut() {
            file.flush().await?;
        }
        Ok(())
    }
}
