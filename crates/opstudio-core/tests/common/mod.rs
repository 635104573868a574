#![allow(dead_code)]

use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Arbitrary acyclic JSON value, including any finite f64.
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<u64>().prop_map(|n| json!(n)),
        (prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO)
            .prop_map(|f| json!(f)),
        "[a-zA-Z0-9 _/~-]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Object-shaped screen version whose keys all start with `prefix`.
pub fn arb_screen(prefix: &'static str) -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", arb_json(), 0..8).prop_map(move |m| {
        let map: Map<String, Value> = m
            .into_iter()
            .map(|(k, v)| (format!("{}{}", prefix, k), v))
            .collect();
        Value::Object(map)
    })
}

/// Array-shaped screen version: elements with unique `id`s starting with
/// `prefix`, in arbitrary order.
pub fn arb_screen_array(prefix: &'static str) -> impl Strategy<Value = Value> {
    arb_screen_elements(prefix).prop_map(Value::Array)
}

/// An array-shaped version paired with the same elements reordered.
pub fn arb_screen_array_reordered(prefix: &'static str) -> impl Strategy<Value = (Value, Value)> {
    arb_screen_elements(prefix).prop_flat_map(|elements| {
        let original = Value::Array(elements.clone());
        (Just(original), Just(elements).prop_shuffle().prop_map(Value::Array))
    })
}

fn arb_screen_elements(prefix: &'static str) -> impl Strategy<Value = Vec<Value>> {
    let props = prop::collection::btree_map("p_[a-z]{1,5}", arb_json(), 0..4);
    prop::collection::btree_map("[a-z]{1,6}", props, 0..8)
        .prop_map(move |m| {
            m.into_iter()
                .map(|(id, props)| {
                    let mut element: Map<String, Value> = props.into_iter().collect();
                    element.insert("id".to_string(), json!(format!("{}{}", prefix, id)));
                    Value::Object(element)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

pub fn element_count(v: &Value) -> usize {
    match v {
        Value::Object(m) => m.len(),
        Value::Array(a) => a.len(),
        _ => 0,
    }
}
