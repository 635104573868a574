//! Screen diff engine.
//!
//! Compares two versions of a screen definition and reports which elements
//! were added, removed, modified or left unchanged.
//!
//! ## Entry point
//!
//! ```
//! use opstudio_core::diff::{compute_diff, render_human_summary};
//! use serde_json::json;
//!
//! let diff = compute_diff(&json!({"a": 1, "b": 2}), &json!({"b": 3, "c": 4}));
//! assert_eq!(diff.summary.modified, 1);
//! let summary = render_human_summary(&diff);
//! assert!(summary.contains("Modified"));
//! ```
//!
//! ## Guarantees
//!
//! - **Identity by id**: elements are matched by object key or by an explicit
//!   id field, never by array position.
//! - **Determinism**: entries follow the older version's order, then the
//!   added elements in the newer version's order.
//! - **Counting**: `added + removed + modified + unchanged == entries.len()`.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, compute_diff_bytes, compute_diff_with, DiffOptions};
pub use human_summary::render_human_summary;
pub use model::{DiffEntry, DiffKind, DiffSummary, ScreenDiff};
