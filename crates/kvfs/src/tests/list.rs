use super::new_client;
use crate::{DEFAULT_DIR_VALUE, Error};

#[tokio::test]
async fn test_list_empty_directory() {
    let (_store, client) = new_client();
    client.create_dir("/empty").await.unwrap();

    let nodes = client.list("/empty").await.unwrap();
    assert!(nodes.is_empty());
}

#[tokio::test]
async fn test_list_direct_children() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.create_dir("/a/b").await.unwrap();
    client.put("/a/f", b"payload").await.unwrap();

    let nodes = client.list("/a").await.unwrap();
    assert_eq!(nodes.len(), 2);

    let b = nodes.iter().find(|n| n.name() == "b").unwrap();
    assert!(b.is_dir);
    assert_eq!(b.key, "/a/b");

    let f = nodes.iter().find(|n| n.name() == "f").unwrap();
    assert!(!f.is_dir);
    assert_eq!(f.value, b"payload");
}

// /a/b is a marker, /a/c/d and /a/c/e are plain values.
// Listing /a yields b (directory) and a synthesized c (directory); no
// entry for d or e individually.
#[tokio::test]
async fn test_list_collapses_descendants() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.create_dir("/a/b").await.unwrap();
    client.put("/a/c/d", b"d").await.unwrap();
    client.put("/a/c/e", b"e").await.unwrap();

    let nodes = client.list("/a").await.unwrap();
    let mut names: Vec<_> = nodes.iter().map(|n| n.name().to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["b", "c"]);
    assert!(nodes.iter().all(|n| n.is_dir));

    // The listing backfilled the marker at /a/c
    let c = client.get("/a/c").await.unwrap();
    assert!(c.is_dir);
}

#[tokio::test]
async fn test_second_list_does_not_recreate_markers() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.put("/a/c/d", b"d").await.unwrap();

    client.list("/a").await.unwrap();
    let first = client.get("/a/c").await.unwrap();
    assert_eq!(first.version, 1);

    client.list("/a").await.unwrap();
    let second = client.get("/a/c").await.unwrap();
    assert_eq!(second.version, 1);
}

#[tokio::test]
async fn test_list_heals_every_missing_level() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.put("/a/c/d/e", b"deep").await.unwrap();

    let nodes = client.list("/a").await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name(), "c");
    assert!(nodes[0].is_dir);

    // The walk created markers at both missing levels, not just the first
    assert!(client.get("/a/c").await.unwrap().is_dir);
    assert!(client.get("/a/c/d").await.unwrap().is_dir);
}

#[tokio::test]
async fn test_list_on_plain_value_fails() {
    let (_store, client) = new_client();
    client.put("/file", b"data").await.unwrap();

    let err = client.list("/file").await.unwrap_err();
    assert_eq!(err, Error::ListOnNonDirectory("/file".to_string()));
}

#[tokio::test]
async fn test_list_on_missing_key_fails() {
    let (_store, client) = new_client();

    let err = client.list("/nowhere").await.unwrap_err();
    assert_eq!(err, Error::ListOnNonDirectory("/nowhere".to_string()));
}

#[tokio::test]
async fn test_duplicate_name_emitted_once() {
    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.put("/a/c", b"plain").await.unwrap();
    client.put("/a/c/d", b"deep").await.unwrap();

    let nodes = client.list("/a").await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name(), "c");
    assert!(!nodes[0].is_dir);

    // The version guard left the user data alone
    let c = client.get("/a/c").await.unwrap();
    assert_eq!(c.value, b"plain");
    assert_eq!(c.version, 1);
}

#[tokio::test]
async fn test_partial_materialization_skips_failed_child() {
    let (store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.create_dir("/a/b").await.unwrap();
    client.put("/a/c/d", b"deep").await.unwrap();

    store.fail_prefix("/a/c").await;

    let report = client.list_report("/a").await.unwrap();
    let names: Vec<_> = report.nodes.iter().map(|n| n.name().to_string()).collect();
    assert_eq!(names, vec!["b"]);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "c");
    assert!(matches!(report.skipped[0].reason, Error::Store(_)));
}

#[tokio::test]
async fn test_list_aborts_when_store_unavailable() {
    let (store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.put("/a/b", b"payload").await.unwrap();

    store.fail_prefix("/a").await;

    // The verify+scan transaction itself failing is a hard error, not
    // a partial report
    let err = client.list_report("/a").await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
}

#[tokio::test]
async fn test_deeper_backfill_failure_still_lists_child() {
    let (store, client) = new_client();
    client.create_dir("/a").await.unwrap();
    client.put("/a/c/x", b"x").await.unwrap();
    client.put("/a/c/d/e", b"deep").await.unwrap();

    // /a/c can be created but /a/c/d cannot
    store.fail_prefix("/a/c/d").await;

    let report = client.list_report("/a").await.unwrap();
    let names: Vec<_> = report.nodes.iter().map(|n| n.name().to_string()).collect();
    assert_eq!(names, vec!["c"]);
    assert!(report.nodes[0].is_dir);
    // The child's own marker materialized, so nothing is reported
    // skipped; only the deeper level is missing
    assert!(report.skipped.is_empty());

    store.clear_faults().await;
    assert!(client.get("/a/c").await.unwrap().is_dir);
    assert_eq!(
        client.get("/a/c/d").await.unwrap_err(),
        Error::NotFound("/a/c/d".to_string())
    );
}

#[tokio::test]
async fn test_list_root() {
    let (_store, client) = new_client();
    client.create_dir("/").await.unwrap();
    client.put("/x", b"x").await.unwrap();
    client.create_dir("/y").await.unwrap();

    let nodes = client.list("/").await.unwrap();
    let mut names: Vec<_> = nodes.iter().map(|n| n.name().to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["x", "y"]);
}

#[tokio::test]
async fn test_put_rejects_sentinel_value() {
    let (_store, client) = new_client();

    let err = client.put("/k", DEFAULT_DIR_VALUE).await.unwrap_err();
    assert_eq!(err, Error::ReservedValue("/k".to_string()));
}

#[tokio::test]
async fn test_cancelled_list() {
    use tokio_util::sync::CancellationToken;

    let (_store, client) = new_client();
    client.create_dir("/a").await.unwrap();

    let token = CancellationToken::new();
    let client = client.with_cancellation(token.clone());
    token.cancel();

    let err = client.list("/a").await.unwrap_err();
    assert_eq!(err, Error::Cancelled);
}

#[tokio::test]
async fn test_custom_dir_value() {
    let (store, _) = new_client();
    let client = crate::Client::new(std::sync::Arc::new(store)).with_dir_value(b"DIR".to_vec());

    client.create_dir("/a").await.unwrap();
    client.put("/a/f", b"payload").await.unwrap();

    let nodes = client.list("/a").await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(!nodes[0].is_dir);

    // The default sentinel is plain data under a custom convention
    client.put("/a/g", DEFAULT_DIR_VALUE).await.unwrap();
    let nodes = client.list("/a").await.unwrap();
    assert_eq!(nodes.len(), 2);
}
