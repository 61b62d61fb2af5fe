//! Tests for the in-memory stores.

use bedtime_storage::{
    ArtifactKey, BlobStore, EphemeralStore, InMemoryBlobStore, InMemoryEphemeralStore,
};
use chrono::NaiveDate;
use uuid::Uuid;

fn key(run_id: Uuid, name: &str) -> ArtifactKey {
    ArtifactKey::new(
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        run_id,
        name,
        "image/png",
    )
    .unwrap()
}

#[tokio::test]
async fn test_blob_store_records_content_type() {
    let store = InMemoryBlobStore::new();
    let key = key(Uuid::new_v4(), "scene_1");

    let uri = store.put(&key, b"img", "image/png").await.unwrap();

    assert_eq!(uri, format!("memory://{}", key));
    assert_eq!(store.keys().await, vec![key.to_string()]);
    assert_eq!(
        store.content_type(&key.to_string()).await.as_deref(),
        Some("image/png")
    );
}

#[tokio::test]
async fn test_ephemeral_evicts_only_one_run() {
    let cache = InMemoryEphemeralStore::new();
    let keep = Uuid::new_v4();
    let evicted = Uuid::new_v4();

    cache.put(&key(keep, "scene_0"), b"a".to_vec()).await;
    cache.put(&key(evicted, "scene_0"), b"b".to_vec()).await;
    cache.put(&key(evicted, "scene_1"), b"c".to_vec()).await;

    assert_eq!(cache.evict_run(evicted).await, 2);
    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.get(&key(keep, "scene_0")).await, Some(b"a".to_vec()));
    assert_eq!(cache.get(&key(evicted, "scene_0")).await, None);
}
