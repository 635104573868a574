//! Preview export with the transient "copied" indicator

use opstudio_core::clipboard::Clipboard;
use opstudio_core::preview::{copy_to_clipboard, serialize, CopyFeedback, CopyOutcome};
use opstudio_core::{log_op_end, log_op_start};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Copies preview text to a clipboard and tracks the feedback window on the
/// tokio clock
pub struct ExportController {
    clipboard: Arc<dyn Clipboard>,
    feedback: Mutex<CopyFeedback>,
}

impl ExportController {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            clipboard,
            feedback: Mutex::new(CopyFeedback::new()),
        }
    }

    /// Copy the canonical preview of `value`
    pub fn copy_value(&self, value: &Value) -> CopyOutcome {
        self.copy_text(&serialize(value))
    }

    pub fn copy_text(&self, text: &str) -> CopyOutcome {
        let start = Instant::now();
        log_op_start!("copy_preview", bytes = text.len());

        let outcome = copy_to_clipboard(self.clipboard.as_ref(), text);
        self.feedback().record(outcome, now());

        let copied = outcome == CopyOutcome::Copied;
        log_op_end!(
            "copy_preview",
            duration_ms = start.elapsed().as_millis() as u64,
            copied = copied
        );
        outcome
    }

    /// `Some("Copied!")` while the indicator is visible
    pub fn feedback_label(&self) -> Option<&'static str> {
        self.feedback().label(now())
    }

    pub fn is_feedback_visible(&self) -> bool {
        self.feedback().is_visible(now())
    }

    fn feedback(&self) -> MutexGuard<'_, CopyFeedback> {
        self.feedback.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Follows tokio's clock so paused-time tests control the window
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
