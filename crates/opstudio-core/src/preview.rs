//! JSON preview and export
//!
//! Renders structured values (rule definitions, screen trees) in a stable,
//! 2-space indented form with sorted object keys, and copies that text to a
//! clipboard with a transient "copied" indicator.

use crate::clipboard::Clipboard;
use crate::errors::{Result, StudioError};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

/// How long the "copied" indicator stays visible after a successful copy
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(2);

pub const COPIED_LABEL: &str = "Copied!";

/// Canonical text form of a structured value
pub fn serialize(value: &Value) -> String {
    // Serializing a Value with string keys cannot fail
    serde_json::to_string_pretty(&canonicalize(value)).unwrap_or_default()
}

/// Parse text produced by [`serialize`] (or any JSON) back into a value
///
/// # Errors
///
/// `StudioError::InvalidDocument` when the text is not valid JSON
pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| StudioError::InvalidDocument {
        message: e.to_string(),
    })
}

/// Rebuild objects with keys inserted in sorted order, so the output is
/// stable whichever map backs `serde_json::Map`.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed,
}

/// Write `text` to the clipboard.
///
/// Failures are logged at debug level and otherwise swallowed.
pub fn copy_to_clipboard(clipboard: &dyn Clipboard, text: &str) -> CopyOutcome {
    match clipboard.write_text(text) {
        Ok(()) => CopyOutcome::Copied,
        Err(err) => {
            tracing::debug!(op = "copy_to_clipboard", error = %err, "clipboard write failed");
            CopyOutcome::Failed
        }
    }
}

/// Visibility of the "copied" indicator.
///
/// Time is passed in so the caller decides which clock drives it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    shown_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy attempt; only a successful one (re)starts the window
    pub fn record(&mut self, outcome: CopyOutcome, now: Instant) {
        if outcome == CopyOutcome::Copied {
            self.shown_at = Some(now);
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK_WINDOW)
    }

    pub fn label(&self, now: Instant) -> Option<&'static str> {
        self.is_visible(now).then_some(COPIED_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use serde_json::json;

    #[test]
    fn test_serialize_uses_two_space_indent_and_sorted_keys() {
        let text = serialize(&json!({"name": "cpu-alert", "enabled": true}));
        assert_eq!(text, "{\n  \"enabled\": true,\n  \"name\": \"cpu-alert\"\n}");
    }

    #[test]
    fn test_serialize_nested_is_stable() {
        let a = json!({"b": {"y": 1, "x": [3, {"k": 1, "j": 2}]}, "a": null});
        assert_eq!(serialize(&a), serialize(&a.clone()));
        assert!(serialize(&a).find("\"a\"") < serialize(&a).find("\"b\""));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse("{not json"),
            Err(StudioError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_copy_outcomes() {
        let ok = MemoryClipboard::new();
        assert_eq!(copy_to_clipboard(&ok, "x"), CopyOutcome::Copied);
        assert_eq!(ok.contents().as_deref(), Some("x"));

        let denied = MemoryClipboard::denied();
        assert_eq!(copy_to_clipboard(&denied, "x"), CopyOutcome::Failed);
    }

    #[test]
    fn test_feedback_window() {
        let t0 = Instant::now();
        let mut feedback = CopyFeedback::new();
        assert!(!feedback.is_visible(t0));

        feedback.record(CopyOutcome::Copied, t0);
        assert_eq!(feedback.label(t0), Some(COPIED_LABEL));
        assert!(feedback.is_visible(t0 + Duration::from_millis(1999)));
        assert!(!feedback.is_visible(t0 + COPY_FEEDBACK_WINDOW));
    }

    #[test]
    fn test_failed_copy_never_shows_feedback() {
        let t0 = Instant::now();
        let mut feedback = CopyFeedback::new();
        feedback.record(CopyOutcome::Failed, t0);
        assert!(!feedback.is_visible(t0));
    }
}
