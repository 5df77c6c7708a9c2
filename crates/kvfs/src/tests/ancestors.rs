use flatkv::FlatStore;

use super::new_client;
use crate::{CreateOutcome, Error};

#[tokio::test]
async fn test_ensure_ancestors_creates_non_leaf_segments() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();

    let first = client.ensure_ancestors("/a/", "c/d/e").await.unwrap();
    assert_eq!(first, "c");

    assert!(client.get("/a/c").await.unwrap().is_dir);
    assert!(client.get("/a/c/d").await.unwrap().is_dir);
    // The leaf is never created by the walk
    assert_eq!(
        client.get("/a/c/d/e").await.unwrap_err(),
        Error::NotFound("/a/c/d/e".to_string())
    );
}

#[tokio::test]
async fn test_ensure_ancestors_is_idempotent() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();

    client.ensure_ancestors("/a/", "c/d").await.unwrap();
    client.ensure_ancestors("/a/", "c/d").await.unwrap();

    // Re-running observes a false version guard; nothing is rewritten
    assert_eq!(client.get("/a/c").await.unwrap().version, 1);
}

#[tokio::test]
async fn test_ensure_ancestors_single_segment() {
    let (store, client) = new_client();

    let first = client.ensure_ancestors("/a/", "b").await.unwrap();
    assert_eq!(first, "b");

    // No non-leaf segments, so no writes
    assert_eq!(store.range_get("/").await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_ensure_ancestors_aborts_on_store_failure() {
    let (store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    store.fail_prefix("/a/c/d").await;

    let err = client.ensure_ancestors("/a/", "c/d/e").await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));

    // Segments before the failure were created; partial creation is
    // allowed and safe to re-observe
    assert!(client.get("/a/c").await.unwrap().is_dir);
}

#[tokio::test]
async fn test_create_dir_outcomes() {
    let (_store, client) = new_client();

    assert_eq!(
        client.create_dir("/d").await.unwrap(),
        CreateOutcome::Created
    );
    assert_eq!(
        client.create_dir("/d").await.unwrap(),
        CreateOutcome::AlreadyExists
    );
}
