mod common;

use common::{png, FakeImageHost};
use course_catalog::errors::AppError;
use course_catalog::models::upload_model::{SelectedFile, UploadPhase, MAX_UPLOAD_BYTES};
use course_catalog::services::upload_service::{
    UploadCoordinator, FILE_TOO_LARGE, NOT_AN_IMAGE, UPLOAD_FAILED,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn oversized_file_never_reaches_the_host() {
    let host = Arc::new(FakeImageHost::new());
    let uploads = UploadCoordinator::new(host.clone());

    let err = uploads.upload(png("huge.png", MAX_UPLOAD_BYTES + 1)).await.unwrap_err();

    assert!(matches!(&err, AppError::Validation(m) if m == FILE_TOO_LARGE));
    assert_eq!(host.calls(), 0);

    let state = uploads.state();
    assert_eq!(state.phase, UploadPhase::Idle);
    assert_eq!(state.error.as_deref(), Some(FILE_TOO_LARGE));
    assert_eq!(state.preview_url, None);
    assert_eq!(uploads.live_preview(), None);
}

#[tokio::test]
async fn non_image_is_rejected() {
    let host = Arc::new(FakeImageHost::new());
    let uploads = UploadCoordinator::new(host.clone());

    let err = uploads
        .upload(SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), NOT_AN_IMAGE);
    assert_eq!(host.calls(), 0);
}

#[tokio::test]
async fn file_of_exactly_five_megabytes_is_accepted() {
    let host = Arc::new(FakeImageHost::new());
    let uploads = UploadCoordinator::new(host.clone());

    let url = uploads.upload(png("edge.png", MAX_UPLOAD_BYTES)).await.unwrap();
    assert!(url.ends_with("edge.png"));
    assert_eq!(host.calls(), 1);
}

#[tokio::test]
async fn successful_upload_publishes_remote_url() {
    let uploads = UploadCoordinator::new(Arc::new(FakeImageHost::new()));

    let url = uploads.upload(png("cover.png", 1024)).await.unwrap();
    let state = uploads.state();

    assert_eq!(state.phase, UploadPhase::Done);
    assert_eq!(state.progress_percent, 100);
    assert_eq!(state.remote_url.as_deref(), Some(url.as_str()));
    assert_eq!(state.preview_url.as_deref(), Some(url.as_str()));
    assert_eq!(state.error, None);
    assert_eq!(uploads.live_preview(), None);
}

#[tokio::test]
async fn failed_upload_can_be_retried() {
    let host = Arc::new(FakeImageHost::failing());
    let uploads = UploadCoordinator::new(host.clone());

    assert!(uploads.upload(png("cover.png", 1024)).await.is_err());
    let state = uploads.state();
    assert_eq!(state.phase, UploadPhase::Error);
    assert_eq!(state.progress_percent, 0);
    assert_eq!(state.remote_url, None);
    assert_eq!(state.error.as_deref(), Some(UPLOAD_FAILED));
    assert!(state.phase.accepts_selection());

    host.fail.store(false, Ordering::SeqCst);
    uploads.upload(png("cover.png", 1024)).await.unwrap();
    assert_eq!(uploads.state().phase, UploadPhase::Done);
    assert_eq!(host.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn second_selection_while_uploading_is_refused() {
    let host = Arc::new(FakeImageHost::with_delay(Duration::from_secs(1)));
    let uploads = UploadCoordinator::new(host.clone());

    let first = tokio::spawn({
        let uploads = uploads.clone();
        async move { uploads.upload(png("a.png", 10)).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(uploads.is_uploading());
    assert!(uploads.live_preview().is_some());
    let err = uploads.upload(png("b.png", 10)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    first.await.unwrap().unwrap();
    assert_eq!(host.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn progress_climbs_without_passing_ninety() {
    let host = Arc::new(FakeImageHost::with_delay(Duration::from_secs(5)));
    let uploads = UploadCoordinator::new(host);
    let mut rx = uploads.subscribe();

    let task = tokio::spawn({
        let uploads = uploads.clone();
        async move { uploads.upload(png("slow.png", 10)).await }
    });

    tokio::time::sleep(Duration::from_millis(450)).await;
    let midway = uploads.state();
    assert_eq!(midway.phase, UploadPhase::Uploading);
    assert!((10..=90).contains(&midway.progress_percent), "{:?}", midway);

    let mut seen = Vec::new();
    loop {
        let state = rx.borrow_and_update().clone();
        seen.push(state.progress_percent);
        if state.phase == UploadPhase::Done {
            break;
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
    task.await.unwrap().unwrap();

    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{:?}", seen);
    assert_eq!(seen.last(), Some(&100));
    assert!(seen.iter().rev().skip(1).all(|p| *p <= 90), "{:?}", seen);
    assert!(seen.contains(&90));
}

#[tokio::test(start_paused = true)]
async fn reset_discards_a_late_result() {
    let uploads = UploadCoordinator::new(Arc::new(FakeImageHost::with_delay(Duration::from_secs(1))));

    let task = tokio::spawn({
        let uploads = uploads.clone();
        async move { uploads.upload(png("late.png", 10)).await }
    });
    tokio::time::sleep(Duration::from_millis(300)).await;

    uploads.reset();
    assert_eq!(uploads.live_preview(), None);

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Discarded));

    let state = uploads.state();
    assert_eq!(state.phase, UploadPhase::Idle);
    assert_eq!(state.remote_url, None);
    assert_eq!(state.progress_percent, 0);
}

#[test]
fn reset_with_existing_thumbnail_shows_it() {
    let uploads = UploadCoordinator::new(Arc::new(FakeImageHost::new()));

    uploads.reset_with_preview(Some("https://img.example.com/c1.png".to_string()));
    assert_eq!(
        uploads.state().preview_url.as_deref(),
        Some("https://img.example.com/c1.png")
    );

    uploads.reset_with_preview(Some(String::new()));
    assert_eq!(uploads.state().preview_url, None);
}
