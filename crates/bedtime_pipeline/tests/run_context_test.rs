//! Run context tests: artifact persistence and run state.

mod test_utils;

use bedtime_error::{BedtimeErrorKind, FailureKind};
use bedtime_pipeline::{
    EPHEMERAL_URI_SCHEME, InputImage, RunContext, StateKey, StateValue, USER_IMAGE_ARTIFACT,
};
use bedtime_storage::{InMemoryBlobStore, InMemoryEphemeralStore, MediaType};
use std::sync::Arc;
use test_utils::{FlakyBlobStore, photo};

fn stores() -> (Arc<InMemoryBlobStore>, Arc<InMemoryEphemeralStore>) {
    (
        Arc::new(InMemoryBlobStore::new()),
        Arc::new(InMemoryEphemeralStore::new()),
    )
}

fn is_not_found(err: &bedtime_error::BedtimeError) -> bool {
    matches!(err.kind(), BedtimeErrorKind::Storage(e) if e.is_not_found())
}

#[tokio::test]
async fn test_start_records_prompt_and_photo() -> anyhow::Result<()> {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::start(
        "a picnic",
        Some(InputImage::new(photo())),
        blob.clone(),
        ephemeral,
    )
    .await?;

    assert_eq!(ctx.state().input_text(), Some("a picnic"));
    let image = ctx.state().user_image().expect("user image reference");
    assert_eq!(image.name, USER_IMAGE_ARTIFACT);
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.media_type, MediaType::Image);
    assert!(image.key.contains(&ctx.run_id().to_string()));
    assert!(image.key.ends_with("/user_image.png"));
    assert_eq!(blob.keys().await, vec![image.key.clone()]);
    Ok(())
}

#[tokio::test]
async fn test_start_without_photo_records_prompt_only() -> anyhow::Result<()> {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::start("", None, blob.clone(), ephemeral).await?;

    assert_eq!(ctx.state().input_text(), Some(""));
    assert!(!ctx.state().contains(StateKey::UserImage));
    assert!(blob.keys().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_start_keeps_photo_when_durable_write_fails() -> anyhow::Result<()> {
    let blob = Arc::new(FlakyBlobStore::failing_on(&[USER_IMAGE_ARTIFACT]));
    let ctx = RunContext::start(
        "a picnic",
        Some(InputImage::new(photo())),
        blob.clone(),
        Arc::new(InMemoryEphemeralStore::new()),
    )
    .await?;

    let image = ctx.state().user_image().expect("user image reference");
    assert!(image.uri.starts_with(EPHEMERAL_URI_SCHEME));
    assert!(image.uri.ends_with(&image.key));
    assert_eq!(image.size_bytes, photo().len() as u64);
    assert_eq!(ctx.get_artifact(USER_IMAGE_ARTIFACT).await?, photo());
    assert!(blob.inner().keys().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_run_ids_are_unique() {
    let (blob, ephemeral) = stores();
    let a = RunContext::new(blob.clone(), ephemeral.clone());
    let b = RunContext::new(blob, ephemeral);
    assert_ne!(a.run_id(), b.run_id());
}

#[tokio::test]
async fn test_put_then_get_round_trips_with_reference_metadata() -> anyhow::Result<()> {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::new(blob, ephemeral);

    let reference = ctx
        .put_artifact("story_audio", b"RIFFdata".to_vec(), "audio/wav")
        .await?;

    assert_eq!(reference.size_bytes, 8);
    assert_eq!(reference.content_hash.len(), 64);
    assert_eq!(reference.media_type, MediaType::Audio);
    assert!(reference.uri.starts_with("memory://"));
    assert_eq!(ctx.get_artifact("story_audio").await?, b"RIFFdata");
    Ok(())
}

#[tokio::test]
async fn test_get_falls_back_to_durable_store() -> anyhow::Result<()> {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::new(blob, ephemeral.clone());
    ctx.put_artifact("scene_0", b"png".to_vec(), "image/png").await?;

    assert_eq!(ctx.evict_ephemeral().await, 1);
    assert!(ephemeral.is_empty().await);
    assert_eq!(ctx.get_artifact("scene_0").await?, b"png");
    Ok(())
}

#[tokio::test]
async fn test_unknown_artifact_is_not_found() {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::new(blob, ephemeral);

    let err = ctx.get_artifact("scene_9").await.unwrap_err();
    assert!(is_not_found(&err));
}

#[tokio::test]
async fn test_durable_failure_keeps_ephemeral_copy() -> anyhow::Result<()> {
    let blob = Arc::new(FlakyBlobStore::always_failing());
    let ephemeral = Arc::new(InMemoryEphemeralStore::new());
    let ctx = RunContext::new(blob.clone(), ephemeral);

    let err = ctx
        .put_artifact("scene_0", b"png".to_vec(), "image/png")
        .await
        .unwrap_err();
    let step = bedtime_pipeline::classify_error(err);
    assert_eq!(step.failure_kind(), FailureKind::StorageError);

    assert_eq!(ctx.get_artifact("scene_0").await?, b"png");
    assert!(blob.inner().keys().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_artifact_names_are_write_once() -> anyhow::Result<()> {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::new(blob, ephemeral);
    ctx.put_artifact("scene_0", b"first".to_vec(), "image/png").await?;

    assert!(
        ctx.put_artifact("scene_0", b"second".to_vec(), "image/png")
            .await
            .is_err()
    );
    assert_eq!(ctx.get_artifact("scene_0").await?, b"first");
    Ok(())
}

#[tokio::test]
async fn test_invalid_artifact_name_is_rejected() {
    let (blob, ephemeral) = stores();
    let ctx = RunContext::new(blob, ephemeral);
    assert!(
        ctx.put_artifact("../escape", b"x".to_vec(), "image/png")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_state_keys_are_write_once() -> anyhow::Result<()> {
    let (blob, ephemeral) = stores();
    let mut ctx = RunContext::start("a picnic", None, blob, ephemeral).await?;

    let err = ctx
        .state_mut()
        .set(StateKey::InputText, StateValue::Text("overwrite".to_string()))
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::StateConflict);
    assert_eq!(ctx.state().input_text(), Some("a picnic"));
    Ok(())
}

#[tokio::test]
async fn test_ephemeral_entries_are_isolated_per_run() -> anyhow::Result<()> {
    let blob = Arc::new(InMemoryBlobStore::new());
    let ephemeral = Arc::new(InMemoryEphemeralStore::new());
    let a = RunContext::new(blob.clone(), ephemeral.clone());
    let b = RunContext::new(blob.clone(), ephemeral.clone());

    a.put_artifact("scene_0", b"a".to_vec(), "image/png").await?;
    b.put_artifact("scene_0", b"b".to_vec(), "image/png").await?;
    a.evict_ephemeral().await;

    assert_eq!(b.get_artifact("scene_0").await?, b"b");
    assert!(!blob.keys().await.is_empty());
    Ok(())
}
