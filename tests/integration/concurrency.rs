use super::support::{catalog, picker_over, TrackingSource};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_cached_children_are_not_refetched() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);

    let first = picker.store().get_or_fetch("electronics").await.unwrap();
    let second = picker.store().get_or_fetch("electronics").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.children_calls("electronics"), 1);
}

#[tokio::test]
async fn test_concurrent_expands_share_one_fetch() {
    let source = Arc::new(TrackingSource::with_latency(catalog(), Duration::from_millis(5)));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    let (a, b) = tokio::join!(picker.expand("electronics"), picker.expand("electronics"));
    a.unwrap();
    b.unwrap();

    assert_eq!(source.children_calls("electronics"), 1);
    assert!(picker.is_expanded("electronics"));
}

#[tokio::test]
async fn test_toggle_during_expand_reuses_the_fetch() {
    let source = Arc::new(TrackingSource::with_latency(catalog(), Duration::from_millis(5)));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    let (expanded, toggled) = tokio::join!(
        picker.expand("electronics"),
        picker.toggle("electronics", true)
    );
    expanded.unwrap();
    toggled.unwrap();

    assert_eq!(source.children_calls("electronics"), 1);
    assert_eq!(source.children_calls("audio"), 1);
    assert_eq!(picker.checked_ids().len(), 4);
}

#[tokio::test]
async fn test_expand_during_toggle_reuses_the_staged_fetch() {
    let source = Arc::new(TrackingSource::with_latency(catalog(), Duration::from_millis(5)));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    let (toggled, expanded) = tokio::join!(
        picker.toggle("electronics", true),
        picker.expand("electronics")
    );
    toggled.unwrap();
    expanded.unwrap();

    assert_eq!(source.children_calls("electronics"), 1);
    assert_eq!(source.children_calls("audio"), 1);
    assert_eq!(picker.checked_ids().len(), 4);
    assert_eq!(picker.store().pending_len(), 0);
}

#[tokio::test]
async fn test_overlapping_queries_fetch_each_level_once() {
    let source = Arc::new(TrackingSource::with_latency(catalog(), Duration::from_millis(5)));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    let (first, second) = tokio::join!(picker.set_query("p"), picker.set_query("ph"));
    first.unwrap();
    second.unwrap();

    for id in ["electronics", "audio", "books"] {
        assert_eq!(source.children_calls(id), 1, "children of {} fetched twice", id);
    }
    assert_eq!(picker.search_results().unwrap().query, "ph");
    assert_eq!(picker.store().pending_len(), 0);
}

#[tokio::test]
async fn test_leaf_is_never_fetched_or_stored() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    let children = picker.store().get_or_fetch("garden").await.unwrap();

    assert!(children.is_empty());
    assert!(!picker.store().is_loaded("garden"));
    assert_eq!(source.children_calls("garden"), 0);
}

#[tokio::test]
async fn test_collapse_during_expand_wins() {
    let source = Arc::new(TrackingSource::with_latency(catalog(), Duration::from_millis(5)));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    let (expanded, _) = tokio::join!(picker.expand("electronics"), async {
        tokio::task::yield_now().await;
        picker.collapse("electronics");
    });
    expanded.unwrap();

    assert!(!picker.is_expanded("electronics"));
    assert!(picker.store().is_loaded("electronics"));
}

#[tokio::test]
async fn test_search_paths_resolve_once_per_match() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    picker.set_query("pho").await.unwrap();

    assert_eq!(source.path_calls(), 3);
}
