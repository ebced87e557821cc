use super::support::{catalog, minimal, picker_over, TrackingSource};
use picktree::CheckState;
use std::sync::Arc;

#[tokio::test]
async fn test_checking_parent_loads_and_checks_child() {
    let source = Arc::new(TrackingSource::new(minimal()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    assert!(!picker.store().is_loaded("electronics"));

    picker.toggle("electronics", true).await.unwrap();

    assert!(picker.store().is_loaded("electronics"));
    assert_eq!(picker.derived_state("electronics"), CheckState::Checked);
    assert!(picker.is_checked("phones"));
    assert!(picker.are_all_children_checked("electronics"));
}

#[tokio::test]
async fn test_subtree_toggle_checks_every_descendant() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    picker.toggle("electronics", true).await.unwrap();

    assert_eq!(
        picker.checked_ids(),
        vec!["headphones", "phones", "photo", "speakers"]
    );
    assert_eq!(picker.derived_state("audio"), CheckState::Checked);
    assert_eq!(picker.derived_state("books"), CheckState::Unchecked);
}

#[tokio::test]
async fn test_partial_selection_is_indeterminate_up_the_chain() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    picker.expand("electronics").await.unwrap();
    picker.expand("audio").await.unwrap();

    picker.toggle("speakers", true).await.unwrap();

    assert_eq!(picker.derived_state("audio"), CheckState::Indeterminate);
    assert_eq!(picker.derived_state("electronics"), CheckState::Indeterminate);

    picker.toggle("headphones", true).await.unwrap();
    assert_eq!(picker.derived_state("audio"), CheckState::Checked);
    assert_eq!(picker.derived_state("electronics"), CheckState::Indeterminate);
}

#[tokio::test]
async fn test_unchecking_parent_clears_subtree() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    picker.toggle("books", true).await.unwrap();
    assert_eq!(picker.derived_state("books"), CheckState::Checked);
    picker.toggle("books", false).await.unwrap();

    assert_eq!(picker.derived_state("books"), CheckState::Unchecked);
    assert!(picker.checked_ids().is_empty());
}

#[tokio::test]
async fn test_unloaded_parent_is_unchecked() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    assert_eq!(picker.derived_state("electronics"), CheckState::Unchecked);
    assert!(!picker.are_all_children_checked("electronics"));
}

#[tokio::test]
async fn test_second_toggle_reuses_loaded_subtree() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    picker.toggle("electronics", true).await.unwrap();
    let calls = source.total_children_calls();
    picker.toggle("electronics", false).await.unwrap();

    assert_eq!(source.total_children_calls(), calls);
}
