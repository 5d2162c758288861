//! Media placement: content types, size ceiling, staging and retirement.
//!
//! Run with: `cargo test --test media_test`
mod common;

use uuid::Uuid;

use casting_backend::media::{
    MediaError, MediaKind, MediaStore, Placement, commit_all, destination, public_url,
    retire_superseded,
};

#[test]
fn test_extension_follows_content_type() {
    let kind = MediaKind::ProfileImage;
    assert_eq!(kind.extension_for("headshot", "image/jpeg").unwrap(), ".jpg");
    assert_eq!(kind.extension_for("headshot", "image/jpg").unwrap(), ".jpg");
    assert_eq!(kind.extension_for("headshot", "image/png").unwrap(), ".png");
    assert_eq!(kind.extension_for("headshot", "IMAGE/WEBP").unwrap(), ".webp");
    assert_eq!(
        MediaKind::BannerDocument
            .extension_for("bannerPdf", "application/pdf")
            .unwrap(),
        ".pdf"
    );
}

#[test]
fn test_content_type_is_checked_per_call_site() {
    let err = MediaKind::ProfileImage
        .extension_for("headshot", "application/pdf")
        .unwrap_err();
    assert!(matches!(err, MediaError::UnsupportedType { .. }));
    assert_eq!(err.field(), Some("headshot"));

    assert!(MediaKind::BannerDocument.extension_for("bannerPdf", "image/png").is_err());
    assert!(MediaKind::BannerImage.extension_for("bannerImage", "image/gif").is_err());
    assert!(MediaKind::BannerImage.extension_for("bannerImage", "").is_err());
}

#[test]
fn test_destination_and_url() {
    let owner = Uuid::new_v4();
    let path = destination(owner, "headshot", ".png");
    assert_eq!(path, format!("{owner}/headshot.png"));
    assert_eq!(
        public_url("http://localhost:8080/uploads/", &path),
        format!("http://localhost:8080/uploads/{owner}/headshot.png")
    );
}

#[tokio::test]
async fn test_staged_file_lands_at_slot_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = common::test_store(dir.path());
    let owner = Uuid::new_v4();

    let mut staged = store
        .stage(owner, "headshot", MediaKind::ProfileImage, "image/png")
        .await
        .unwrap();
    staged.write_chunk(common::PNG_BYTES).await.unwrap();
    staged.finish().await.unwrap();

    let path = store.commit(staged).await.unwrap();
    assert_eq!(path, format!("{owner}/headshot.png"));
    let stored = tokio::fs::read(store.absolute(&path)).await.unwrap();
    assert_eq!(stored, common::PNG_BYTES);

    // No staging leftovers next to the committed file.
    let mut entries = tokio::fs::read_dir(dir.path().join(owner.to_string())).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    assert_eq!(names, vec!["headshot.png".to_string()]);
}

#[tokio::test]
async fn test_oversize_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = MediaStore::new(dir.path(), 16);
    let owner = Uuid::new_v4();

    let mut staged = store
        .stage(owner, "fullBody", MediaKind::ProfileImage, "image/jpeg")
        .await
        .unwrap();
    staged.write_chunk(&[0u8; 10]).await.unwrap();
    let err = staged.write_chunk(&[0u8; 10]).await.unwrap_err();
    assert!(matches!(err, MediaError::TooLarge { limit: 16, .. }));

    store.discard(staged).await;
    let dir_path = dir.path().join(owner.to_string());
    let mut entries = tokio::fs::read_dir(&dir_path).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = common::test_store(dir.path());

    let mut staged = store
        .stage(Uuid::new_v4(), "profile", MediaKind::ProfileImage, "image/webp")
        .await
        .unwrap();
    let err = staged.finish().await.unwrap_err();
    assert!(matches!(err, MediaError::Empty(ref f) if f == "profile"));
    store.discard(staged).await;
}

#[tokio::test]
async fn test_reupload_with_new_type_retires_old_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = common::test_store(dir.path());
    let owner = Uuid::new_v4();

    let mut first = store
        .stage(owner, "headshot", MediaKind::ProfileImage, "image/png")
        .await
        .unwrap();
    first.write_chunk(common::PNG_BYTES).await.unwrap();
    first.finish().await.unwrap();
    let old = commit_all(&store, vec![first]).await.unwrap();
    let old_path = old[0].path.clone();

    let mut second = store
        .stage(owner, "headshot", MediaKind::ProfileImage, "image/jpeg")
        .await
        .unwrap();
    second.write_chunk(common::JPEG_BYTES).await.unwrap();
    second.finish().await.unwrap();
    let current = commit_all(&store, vec![second]).await.unwrap();
    assert_eq!(current[0].path, format!("{owner}/headshot.jpg"));

    retire_superseded(&store, &[old_path.clone()], &current).await;
    assert!(!store.absolute(&old_path).exists());
    assert!(store.absolute(&current[0].path).exists());
}

#[tokio::test]
async fn test_same_path_is_never_retired() {
    let dir = tempfile::tempdir().unwrap();
    let store = common::test_store(dir.path());
    let owner = Uuid::new_v4();

    let mut staged = store
        .stage(owner, "headshot", MediaKind::ProfileImage, "image/png")
        .await
        .unwrap();
    staged.write_chunk(common::PNG_BYTES).await.unwrap();
    staged.finish().await.unwrap();
    let current = commit_all(&store, vec![staged]).await.unwrap();

    // The previous reference pointed at the very path that was just overwritten.
    let superseded = vec![current[0].path.clone()];
    retire_superseded(&store, &superseded, &current).await;
    assert!(store.absolute(&current[0].path).exists());
}

#[tokio::test]
async fn test_retiring_a_missing_file_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let store = common::test_store(dir.path());
    let current = vec![Placement {
        slot: "headshot".to_string(),
        path: "someone/headshot.png".to_string(),
    }];
    retire_superseded(&store, &["someone/headshot.webp".to_string()], &current).await;
}

#[test]
fn test_image_kinds_list_each_extension_once() {
    let exts: Vec<&str> = MediaKind::BannerImage.extensions().collect();
    assert_eq!(exts, vec![".jpg", ".png", ".webp"]);
    let exts: Vec<&str> = MediaKind::BannerDocument.extensions().collect();
    assert_eq!(exts, vec![".pdf"]);
}

#[tokio::test]
async fn test_removing_slots_clears_unreferenced_owner_dir() {
    let dir = tempfile::tempdir().unwrap();
    let store = common::test_store(dir.path());
    let owner = Uuid::new_v4();
    let slots = [
        ("bannerImage", MediaKind::BannerImage),
        ("bannerPdf", MediaKind::BannerDocument),
    ];

    let mut image = store
        .stage(owner, "bannerImage", MediaKind::BannerImage, "image/webp")
        .await
        .unwrap();
    image.write_chunk(common::PNG_BYTES).await.unwrap();
    image.finish().await.unwrap();
    let placed = commit_all(&store, vec![image]).await.unwrap();
    assert!(store.absolute(&placed[0].path).exists());

    // Only one banner made it to disk; the other slot has nothing to remove.
    store.remove_slots_best_effort(owner, &slots).await;
    assert!(!store.absolute(&placed[0].path).exists());
    assert!(!dir.path().join(owner.to_string()).exists());
}
