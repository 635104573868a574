//! Screen diff scenarios and properties.
//!
//! All tests operate on in-memory JSON values (no I/O).

mod common;

use common::{arb_screen, arb_screen_array, arb_screen_array_reordered, element_count};
use opstudio_core::diff::engine::{compute_diff_bytes, compute_diff_with, DiffOptions};
use opstudio_core::diff::model::WHOLE_DOCUMENT_ID;
use opstudio_core::diff::{compute_diff, DiffKind};
use opstudio_core::errors::ExErrorKind;
use proptest::prelude::*;
use serde_json::json;

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_object_keys_added_removed_modified() {
    let diff = compute_diff(&json!({"a": 1, "b": 2}), &json!({"b": 3, "c": 4}));

    assert_eq!(diff.summary.added, 1);
    assert_eq!(diff.summary.removed, 1);
    assert_eq!(diff.summary.modified, 1);
    assert_eq!(diff.summary.unchanged, 0);

    assert_eq!(diff.entry("c").map(|e| e.kind), Some(DiffKind::Added));
    assert_eq!(diff.entry("a").map(|e| e.kind), Some(DiffKind::Removed));
    let b = diff.entry("b").unwrap();
    assert_eq!(b.kind, DiffKind::Modified);
    assert_eq!(b.before, Some(json!(2)));
    assert_eq!(b.after, Some(json!(3)));
    assert!(diff.is_consistent());
}

#[test]
fn test_empty_inputs_yield_zero_summary() {
    for (a, b) in [
        (json!({}), json!({})),
        (json!([]), json!([])),
        (json!(null), json!(null)),
        (json!({}), json!([])),
    ] {
        let diff = compute_diff(&a, &b);
        assert_eq!(diff.summary.total(), 0, "{} vs {}", a, b);
        assert!(diff.entries.is_empty());
    }
}

#[test]
fn test_array_elements_matched_by_id_not_position() {
    let before = json!([
        {"id": "header", "type": "text", "value": "Ops"},
        {"id": "chart", "type": "line"}
    ]);
    // Same elements, reordered, chart changed
    let after = json!([
        {"id": "chart", "type": "bar"},
        {"id": "header", "type": "text", "value": "Ops"}
    ]);
    let diff = compute_diff(&before, &after);
    assert_eq!(diff.summary.unchanged, 1);
    assert_eq!(diff.summary.modified, 1);
    assert_eq!(diff.summary.added + diff.summary.removed, 0);
    assert_eq!(diff.entry("chart").unwrap().changed_paths, vec!["/type"]);
}

#[test]
fn test_reused_index_is_not_a_rename() {
    let before = json!([{"id": "old", "label": "x"}]);
    let after = json!([{"id": "new", "label": "x"}]);
    let diff = compute_diff(&before, &after);
    assert_eq!(diff.summary.removed, 1);
    assert_eq!(diff.summary.added, 1);
    assert_eq!(diff.summary.modified, 0);
}

#[test]
fn test_entry_order_is_before_order_then_added() {
    let before = json!([{"id": "z"}, {"id": "a"}]);
    let after = json!([{"id": "n"}, {"id": "a"}, {"id": "m"}]);
    let ids: Vec<_> = compute_diff(&before, &after)
        .entries
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["z", "a", "n", "m"]);
}

#[test]
fn test_missing_ids_degrade_to_whole_document() {
    let before = json!([{"type": "text"}, {"type": "chart"}]);
    let after = json!([{"type": "chart"}, {"type": "text"}]);
    let diff = compute_diff(&before, &after);
    assert_eq!(diff.entries.len(), 1);
    let entry = &diff.entries[0];
    assert_eq!(entry.id, WHOLE_DOCUMENT_ID);
    assert_eq!(entry.kind, DiffKind::Modified);

    let same = compute_diff(&before, &before);
    assert_eq!(same.summary.unchanged, 1);
}

#[test]
fn test_duplicate_ids_degrade_to_whole_document() {
    let v = json!([{"id": "a"}, {"id": "a"}]);
    let diff = compute_diff(&v, &json!([{"id": "a"}]));
    assert_eq!(diff.entries[0].id, WHOLE_DOCUMENT_ID);
}

#[test]
fn test_first_version_reports_everything_added() {
    let diff = compute_diff(&json!(null), &json!({"header": {}, "footer": {}}));
    assert_eq!(diff.summary.added, 2);
    assert!(diff.entries.iter().all(|e| e.before.is_none()));
}

#[test]
fn test_shape_change_is_whole_document_modification() {
    let diff = compute_diff(&json!({"a": 1}), &json!([{"id": "a"}]));
    assert_eq!(diff.summary.modified, 1);
    assert_eq!(diff.entries[0].id, WHOLE_DOCUMENT_ID);
}

#[test]
fn test_numeric_representation_does_not_count_as_change() {
    let diff = compute_diff(&json!({"w": {"width": 1}}), &json!({"w": {"width": 1.0}}));
    assert_eq!(diff.summary.unchanged, 1);
}

#[test]
fn test_custom_id_field_option() {
    let options = DiffOptions {
        id_field: "key".into(),
    };
    let diff = compute_diff_with(
        &json!([{"key": "k1", "v": 1}]),
        &json!([{"key": "k1", "v": 2}]),
        &options,
    );
    assert_eq!(diff.entry("k1").map(|e| e.kind), Some(DiffKind::Modified));
}

#[test]
fn test_compute_diff_bytes_reports_invalid_side() {
    let err = compute_diff_bytes(b"{}", b"{oops", &DiffOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidDocument);
    assert_eq!(err.entity_id(), Some("after"));
}

#[test]
fn test_diff_serializes_deterministically() {
    let a = json!({"a": 1, "b": {"x": [1, 2]}});
    let b = json!({"b": {"x": [2, 1]}, "c": true});
    let s1 = serde_json::to_string(&compute_diff(&a, &b)).unwrap();
    let s2 = serde_json::to_string(&compute_diff(&a, &b)).unwrap();
    assert_eq!(s1, s2);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_disjoint_ids_have_no_unchanged(a in arb_screen("a_"), b in arb_screen("b_")) {
        let diff = compute_diff(&a, &b);
        prop_assert_eq!(diff.summary.unchanged, 0);
        prop_assert_eq!(diff.summary.modified, 0);
        prop_assert_eq!(
            diff.summary.added + diff.summary.removed,
            element_count(&a) + element_count(&b)
        );
    }

    #[test]
    fn prop_self_diff_is_all_unchanged(a in arb_screen("e_")) {
        let diff = compute_diff(&a, &a);
        prop_assert_eq!(diff.summary.modified, 0);
        prop_assert_eq!(diff.summary.unchanged, element_count(&a));
    }

    #[test]
    fn prop_diff_is_always_consistent(a in arb_screen("k_"), b in arb_screen("k_")) {
        let diff = compute_diff(&a, &b);
        prop_assert!(diff.is_consistent());
        prop_assert_eq!(diff.summary.total(), diff.entries.len());
    }

    #[test]
    fn prop_array_disjoint_ids_have_no_unchanged(
        a in arb_screen_array("a_"),
        b in arb_screen_array("b_"),
    ) {
        let diff = compute_diff(&a, &b);
        prop_assert!(diff.entries.iter().all(|e| e.id != WHOLE_DOCUMENT_ID));
        prop_assert_eq!(diff.summary.unchanged, 0);
        prop_assert_eq!(diff.summary.modified, 0);
        prop_assert_eq!(diff.summary.removed, element_count(&a));
        prop_assert_eq!(diff.summary.added, element_count(&b));
    }

    #[test]
    fn prop_array_reordering_is_not_a_change((a, shuffled) in arb_screen_array_reordered("e_")) {
        let diff = compute_diff(&a, &shuffled);
        prop_assert_eq!(diff.summary.modified, 0);
        prop_assert_eq!(diff.summary.added + diff.summary.removed, 0);
        prop_assert_eq!(diff.summary.unchanged, element_count(&a));
    }

    #[test]
    fn prop_array_diff_is_always_consistent(
        a in arb_screen_array("k_"),
        b in arb_screen_array("k_"),
    ) {
        let diff = compute_diff(&a, &b);
        prop_assert!(diff.is_consistent());
        prop_assert_eq!(diff.summary.total(), diff.entries.len());
        prop_assert!(diff.entries.iter().all(|e| e.id != WHOLE_DOCUMENT_ID));
    }
}
