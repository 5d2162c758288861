use super::{MediaError, MediaStore, StagedFile};

/// A file now durably stored at its slot's destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub slot: String,
    pub path: String,
}

/// Move every staged file onto its destination.
///
/// Runs before the owning record is updated, so a reference is never
/// written for a file that does not exist yet. If one move fails, files not
/// yet moved are discarded; files already moved stay at their slot's stable
/// path, where the next upload to that slot overwrites them.
pub async fn commit_all(
    store: &MediaStore,
    staged: Vec<StagedFile>,
) -> Result<Vec<Placement>, MediaError> {
    let mut placed = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();

    while let Some(file) = pending.next() {
        let slot = file.slot().to_string();
        match store.commit(file).await {
            Ok(path) => placed.push(Placement { slot, path }),
            Err(e) => {
                for rest in pending {
                    store.discard(rest).await;
                }
                return Err(e);
            }
        }
    }

    Ok(placed)
}

/// Delete files a record stopped referencing.
///
/// A superseded path equal to one of the new paths was already overwritten
/// in place by the rename and must not be deleted.
pub async fn retire_superseded(store: &MediaStore, superseded: &[String], current: &[Placement]) {
    for old in superseded {
        if current.iter().any(|p| &p.path == old) {
            continue;
        }
        store.remove_best_effort(old).await;
    }
}
