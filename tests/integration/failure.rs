use super::support::{catalog, picker_over, TrackingSource};
use picktree::PickerError;
use std::sync::Arc;

#[tokio::test]
async fn test_failed_subtree_load_aborts_toggle() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    source.fail_on("audio");

    let err = picker.toggle("electronics", true).await.unwrap_err();

    assert!(err.is_fetch_failure());
    assert!(picker.checked_ids().is_empty());
    assert!(!picker.store().is_loaded("electronics"));
    assert!(!picker.store().is_loaded("audio"));

    source.heal("audio");
    picker.toggle("electronics", true).await.unwrap();
    assert_eq!(picker.checked_ids().len(), 4);
}

#[tokio::test]
async fn test_failed_search_changes_nothing() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    source.fail_on("books");

    let err = picker.set_query("pho").await.unwrap_err();

    assert_eq!(
        err,
        PickerError::FetchFailure {
            id: "books".to_string(),
            message: "backend unavailable".to_string(),
        }
    );
    assert!(picker.search_results().is_none());
    assert!(!picker.store().is_loaded("electronics"));
}

#[tokio::test]
async fn test_failed_expand_is_rolled_back() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    source.fail_on("electronics");

    assert!(picker.expand("electronics").await.is_err());
    assert!(!picker.is_expanded("electronics"));
    assert_eq!(picker.visible_nodes().len(), 3);
}

#[tokio::test]
async fn test_failed_root_load_is_surfaced() {
    let source = Arc::new(TrackingSource::new(catalog()));
    source.fail_on(picktree::DEFAULT_ROOT_ID);
    let picker = picker_over(&source);

    assert!(picker.load_roots().await.unwrap_err().is_fetch_failure());
    assert!(picker.visible_nodes().is_empty());
    assert_eq!(picker.focus(), 0);
}

#[tokio::test]
async fn test_failures_are_not_retried() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    source.fail_on("electronics");

    let _ = picker.expand("electronics").await;
    assert_eq!(source.children_calls("electronics"), 1);
}
