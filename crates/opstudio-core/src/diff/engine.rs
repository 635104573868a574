//! Screen diff computation engine.
//!
//! The core entry point is [`compute_diff`], which compares two versions of a
//! screen definition element by element and produces a [`ScreenDiff`].

use crate::diff::model::{DiffEntry, ScreenDiff, WHOLE_DOCUMENT_ID};
use crate::errors::{ExError, ExErrorKind};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

/// How element identifiers are found in array-shaped documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Field that carries the stable element id (default `"id"`)
    pub id_field: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Empty,
    Object,
    Array,
}

/// JSON type an array element's id was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdKind {
    Text,
    Integer,
}

/// Elements of one version, in document order, with unique ids.
struct Keyed<'a> {
    shape: Shape,
    elements: Vec<(String, &'a Value)>,
    id_kinds: HashMap<String, IdKind>,
}

impl Keyed<'_> {
    fn empty() -> Self {
        Keyed {
            shape: Shape::Empty,
            elements: Vec::new(),
            id_kinds: HashMap::new(),
        }
    }
}

/// Parse raw document bytes into a JSON value.
///
/// # Errors
///
/// `InvalidDocument` if the bytes are not valid UTF-8 or not valid JSON
pub fn parse_document(bytes: &[u8]) -> Result<Value, ExError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ExError::new(ExErrorKind::InvalidDocument)
            .with_op("parse_document")
            .with_message(format!("document is not valid UTF-8: {}", e))
    })?;

    serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::InvalidDocument)
            .with_op("parse_document")
            .with_message(format!("document is not valid JSON: {}", e))
    })
}

/// Diff two versions given as raw JSON bytes.
///
/// # Errors
///
/// `InvalidDocument` if either side fails UTF-8/JSON parsing
pub fn compute_diff_bytes(
    before: &[u8],
    after: &[u8],
    options: &DiffOptions,
) -> Result<ScreenDiff, ExError> {
    let start = Instant::now();
    crate::log_op_start!("compute_diff", id_field = options.id_field.as_str());

    let parsed = parse_document(before)
        .map_err(|e| e.with_entity_id("before"))
        .and_then(|b| {
            parse_document(after)
                .map_err(|e| e.with_entity_id("after"))
                .map(|a| (b, a))
        });
    let duration_ms = start.elapsed().as_millis() as u64;

    match parsed {
        Ok((before, after)) => {
            let diff = compute_diff_with(&before, &after, options);
            crate::log_op_end!(
                "compute_diff",
                duration_ms = duration_ms,
                added = diff.summary.added,
                removed = diff.summary.removed,
                modified = diff.summary.modified,
                unchanged = diff.summary.unchanged
            );
            Ok(diff)
        }
        Err(err) => {
            crate::log_op_error!("compute_diff", err.clone(), duration_ms = duration_ms);
            Err(err)
        }
    }
}

/// Compute the element-level diff between two versions with default options.
pub fn compute_diff(before: &Value, after: &Value) -> ScreenDiff {
    compute_diff_with(before, after, &DiffOptions::default())
}

/// Compute the element-level diff between two versions.
///
/// Elements are matched by id: object keys for object-shaped documents, the
/// `id_field` of each element for array-shaped ones. When ids cannot be
/// established for either side the comparison falls back to a single
/// whole-document entry.
///
/// An id written as a string in one version and as an integer in the other
/// (`"7"` vs `7`) is not a stable identity, so it also forces the fallback.
pub fn compute_diff_with(before: &Value, after: &Value, options: &DiffOptions) -> ScreenDiff {
    match (keyed(before, options), keyed(after, options)) {
        (Some(a), Some(b)) if shapes_compatible(a.shape, b.shape) && id_kinds_agree(&a, &b) => {
            diff_elements(&a, &b)
        }
        _ => whole_document_diff(before, after),
    }
}

fn id_kinds_agree(a: &Keyed<'_>, b: &Keyed<'_>) -> bool {
    a.id_kinds
        .iter()
        .all(|(id, kind)| b.id_kinds.get(id).map_or(true, |other| other == kind))
}

fn shapes_compatible(a: Shape, b: Shape) -> bool {
    a == b || a == Shape::Empty || b == Shape::Empty
}

fn keyed<'a>(value: &'a Value, options: &DiffOptions) -> Option<Keyed<'a>> {
    match value {
        _ if is_empty_document(value) => Some(Keyed::empty()),
        Value::Object(map) => Some(Keyed {
            shape: Shape::Object,
            elements: map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            id_kinds: HashMap::new(),
        }),
        Value::Array(items) => {
            let mut id_kinds = HashMap::with_capacity(items.len());
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                let (id, kind) = element_id(item, &options.id_field)?;
                if id_kinds.insert(id.clone(), kind).is_some() {
                    // Duplicate ids are not stable identities
                    return None;
                }
                elements.push((id, item));
            }
            Some(Keyed {
                shape: Shape::Array,
                elements,
                id_kinds,
            })
        }
        _ => None,
    }
}

/// `null`, `{}` and `[]` all mean "no elements".
fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn element_id(item: &Value, id_field: &str) -> Option<(String, IdKind)> {
    match item.as_object()?.get(id_field)? {
        Value::String(s) if !s.is_empty() => Some((s.clone(), IdKind::Text)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some((n.to_string(), IdKind::Integer)),
        _ => None,
    }
}

fn diff_elements(before: &Keyed<'_>, after: &Keyed<'_>) -> ScreenDiff {
    let after_index: HashMap<&str, &Value> = after
        .elements
        .iter()
        .map(|(id, v)| (id.as_str(), *v))
        .collect();
    let before_ids: HashSet<&str> = before.elements.iter().map(|(id, _)| id.as_str()).collect();

    let mut entries = Vec::with_capacity(before.elements.len() + after.elements.len());
    for (id, old) in &before.elements {
        let entry = match after_index.get(id.as_str()) {
            None => DiffEntry::removed(id.clone(), (*old).clone()),
            Some(new) if values_equal(old, new) => {
                DiffEntry::unchanged(id.clone(), (*old).clone(), (*new).clone())
            }
            Some(new) => DiffEntry::modified(
                id.clone(),
                (*old).clone(),
                (*new).clone(),
                changed_paths(old, new),
            ),
        };
        entries.push(entry);
    }
    for (id, new) in &after.elements {
        if !before_ids.contains(id.as_str()) {
            entries.push(DiffEntry::added(id.clone(), (*new).clone()));
        }
    }

    ScreenDiff::from_entries(entries)
}

fn whole_document_diff(before: &Value, after: &Value) -> ScreenDiff {
    let entry = match (is_empty_document(before), is_empty_document(after)) {
        (true, true) => return ScreenDiff::default(),
        (true, false) => DiffEntry::added(WHOLE_DOCUMENT_ID, after.clone()),
        (false, true) => DiffEntry::removed(WHOLE_DOCUMENT_ID, before.clone()),
        (false, false) if values_equal(before, after) => {
            DiffEntry::unchanged(WHOLE_DOCUMENT_ID, before.clone(), after.clone())
        }
        (false, false) => DiffEntry::modified(
            WHOLE_DOCUMENT_ID,
            before.clone(),
            after.clone(),
            changed_paths(before, after),
        ),
    };
    ScreenDiff::from_entries(vec![entry])
}

/// Deep structural equality.
///
/// Numbers compare by value (`1 == 1.0`), object key order is ignored,
/// array order is significant.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => objects_equal(xs, ys),
        _ => a == b,
    }
}

fn objects_equal(xs: &Map<String, Value>, ys: &Map<String, Value>) -> bool {
    xs.len() == ys.len()
        && xs
            .iter()
            .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(p), Some(q)) = (x.as_i64(), y.as_i64()) {
        return p == q;
    }
    if let (Some(p), Some(q)) = (x.as_u64(), y.as_u64()) {
        return p == q;
    }
    x.as_f64() == y.as_f64()
}

/// JSON pointers of the leaves that differ between `a` and `b`.
///
/// An empty pointer means the values differ at the top level (a scalar
/// changed, or the value changed type).
pub fn changed_paths(a: &Value, b: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_changed_paths(a, b, String::new(), &mut out);
    out
}

fn collect_changed_paths(a: &Value, b: &Value, prefix: String, out: &mut Vec<String>) {
    if values_equal(a, b) {
        return;
    }
    match (a, b) {
        (Value::Object(xs), Value::Object(ys)) => {
            let keys: BTreeSet<&String> = xs.keys().chain(ys.keys()).collect();
            for key in keys {
                let path = format!("{}/{}", prefix, escape_pointer_token(key));
                match (xs.get(key), ys.get(key)) {
                    (Some(x), Some(y)) => collect_changed_paths(x, y, path, out),
                    _ => out.push(path),
                }
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            for i in 0..xs.len().max(ys.len()) {
                let path = format!("{}/{}", prefix, i);
                match (xs.get(i), ys.get(i)) {
                    (Some(x), Some(y)) => collect_changed_paths(x, y, path, out),
                    _ => out.push(path),
                }
            }
        }
        _ => out.push(prefix),
    }
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::DiffKind;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(2)));
        assert!(values_equal(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
    }

    #[test]
    fn test_array_order_is_significant() {
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn test_changed_paths_nested() {
        let a = json!({"props": {"color": "red", "size": 1}, "label": "x"});
        let b = json!({"props": {"color": "blue", "size": 1}, "label": "x", "hidden": true});
        assert_eq!(changed_paths(&a, &b), vec!["/hidden", "/props/color"]);
    }

    #[test]
    fn test_changed_paths_scalar_is_root_pointer() {
        assert_eq!(changed_paths(&json!(2), &json!(3)), vec![String::new()]);
    }

    #[test]
    fn test_pointer_tokens_are_escaped() {
        let a = json!({"a/b": 1, "m~n": 1});
        let b = json!({"a/b": 2, "m~n": 2});
        assert_eq!(changed_paths(&a, &b), vec!["/a~1b", "/m~0n"]);
    }

    #[test]
    fn test_numeric_ids_are_stringified() {
        let a = json!([{"id": 7, "v": 1}]);
        let b = json!([{"id": 7, "v": 2}]);
        let diff = compute_diff(&a, &b);
        assert_eq!(diff.entry("7").map(|e| e.kind), Some(DiffKind::Modified));
    }

    #[test]
    fn test_string_and_integer_ids_do_not_match() {
        let diff = compute_diff(&json!([{"id": 7}]), &json!([{"id": "7"}]));
        assert_eq!(diff.entries.len(), 1);
        assert_eq!(diff.entries[0].id, WHOLE_DOCUMENT_ID);
        assert_eq!(diff.summary.unchanged, 0);

        // Same type on both sides keeps element matching
        let diff = compute_diff(&json!([{"id": "7", "v": 1}]), &json!([{"id": "7", "v": 2}]));
        assert_eq!(diff.entry("7").map(|e| e.kind), Some(DiffKind::Modified));
    }

    #[test]
    fn test_mixed_id_types_within_one_version_are_allowed() {
        let before = json!([{"id": 1}, {"id": "header"}]);
        let after = json!([{"id": "header"}, {"id": 2}]);
        let diff = compute_diff(&before, &after);
        assert_eq!(diff.summary.unchanged, 1);
        assert_eq!(diff.summary.removed, 1);
        assert_eq!(diff.summary.added, 1);
    }

    #[test]
    fn test_whole_document_fallback_treats_empty_containers_as_empty() {
        let unkeyed = json!([{"type": "text"}]);
        for empty in [json!([]), json!({}), json!(null)] {
            let removed = compute_diff(&unkeyed, &empty);
            assert_eq!(removed.entries.len(), 1);
            assert_eq!(removed.entries[0].id, WHOLE_DOCUMENT_ID);
            assert_eq!(removed.entries[0].kind, DiffKind::Removed, "to {}", empty);

            let added = compute_diff(&empty, &unkeyed);
            assert_eq!(added.entries[0].kind, DiffKind::Added, "from {}", empty);
            assert!(added.is_consistent());
        }
    }

    #[test]
    fn test_custom_id_field() {
        let options = DiffOptions {
            id_field: "key".to_string(),
        };
        let a = json!([{"key": "header"}]);
        let b = json!([{"key": "header"}, {"key": "footer"}]);
        let diff = compute_diff_with(&a, &b, &options);
        assert_eq!(diff.summary.added, 1);
        assert_eq!(diff.summary.unchanged, 1);
    }

    #[test]
    fn test_parse_document_rejects_invalid_utf8() {
        let err = parse_document(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidDocument);
    }
}
