use super::support::{catalog, ids, picker_over, TrackingSource};
use picktree::{CheckState, Key, KeyOutcome};
use proptest::prelude::*;
use std::sync::Arc;

#[tokio::test]
async fn test_arrow_keys_walk_the_tree() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    picker.handle_key(&Key::Right).await.unwrap();
    assert!(picker.is_expanded("electronics"));
    assert_eq!(
        ids(&picker.visible_nodes()),
        vec!["electronics", "audio", "phones", "photo", "books", "garden"]
    );

    picker.handle_key(&Key::Down).await.unwrap();
    picker.handle_key(&Key::Right).await.unwrap();
    assert_eq!(picker.focused_node().unwrap().id, "audio");
    assert!(picker.is_expanded("audio"));

    picker.handle_key(&Key::Left).await.unwrap();
    assert!(!picker.is_expanded("audio"));
    assert_eq!(picker.focus(), 1);
}

#[tokio::test]
async fn test_right_on_leaf_and_left_on_collapsed_do_nothing() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    picker.handle_key(&Key::Down).await.unwrap();
    picker.handle_key(&Key::Down).await.unwrap();
    assert_eq!(picker.focused_node().unwrap().id, "garden");
    let calls = source.total_children_calls();
    assert_eq!(picker.handle_key(&Key::Right).await.unwrap(), KeyOutcome::Handled);
    assert_eq!(source.total_children_calls(), calls);

    picker.handle_key(&Key::Up).await.unwrap();
    assert_eq!(picker.handle_key(&Key::Left).await.unwrap(), KeyOutcome::Handled);
    assert!(!picker.is_expanded("books"));
}

#[tokio::test]
async fn test_space_flips_display_state() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    picker.expand("books").await.unwrap();
    picker.toggle("novels", true).await.unwrap();
    assert_eq!(picker.derived_state("books"), CheckState::Indeterminate);

    picker.handle_key(&Key::Down).await.unwrap();
    assert_eq!(picker.focused_node().unwrap().id, "books");

    // not all children checked, so Space checks the rest
    picker.handle_key(&Key::Space).await.unwrap();
    assert_eq!(picker.derived_state("books"), CheckState::Checked);

    picker.handle_key(&Key::Enter).await.unwrap();
    assert_eq!(picker.derived_state("books"), CheckState::Unchecked);
}

#[tokio::test]
async fn test_other_keys_pass_through() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();

    for key in ["a", "Tab", "PageDown"] {
        let key: Key = key.parse().unwrap();
        assert_eq!(picker.handle_key(&key).await.unwrap(), KeyOutcome::PassThrough);
    }
    assert_eq!(picker.focus(), 0);
}

#[tokio::test]
async fn test_collapse_pulls_focus_back_into_range() {
    let source = Arc::new(TrackingSource::new(catalog()));
    let picker = picker_over(&source);
    picker.load_roots().await.unwrap();
    picker.expand("electronics").await.unwrap();

    for _ in 0..5 {
        picker.handle_key(&Key::Down).await.unwrap();
    }
    assert_eq!(picker.focused_node().unwrap().id, "garden");

    picker.collapse("electronics");
    assert_eq!(picker.focus(), 2);
    assert_eq!(picker.focused_node().unwrap().id, "garden");
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Left),
        Just(Key::Right),
        Just(Key::Space),
        Just(Key::Escape),
        Just(Key::Char('p')),
    ]
}

proptest! {
    #[test]
    fn test_focus_stays_in_bounds(keys in prop::collection::vec(key_strategy(), 0..24), query in prop::option::of("[a-z]{0,2}")) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let source = Arc::new(TrackingSource::new(catalog()));
            let picker = picker_over(&source);
            picker.load_roots().await.unwrap();
            if let Some(query) = &query {
                picker.set_query(query).await.unwrap();
            }
            for key in &keys {
                picker.handle_key(key).await.unwrap();
                let len = picker.visible_nodes().len();
                assert!(picker.focus() < len.max(1));
            }
        });
    }
}
