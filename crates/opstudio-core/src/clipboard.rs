//! Clipboard seam
//!
//! The system clipboard is an external collaborator; callers inject an
//! implementation. [`MemoryClipboard`] backs tests and headless runs.

use crate::errors::{Result, StudioError};
use std::sync::Mutex;

/// Write-only text clipboard
pub trait Clipboard: Send + Sync {
    /// # Errors
    ///
    /// `StudioError::Clipboard` when the write is refused (e.g. permission denied)
    fn write_text(&self, text: &str) -> Result<()>;
}

/// In-process clipboard holding the last written text
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write, as when permission is denied
    pub fn denied() -> Self {
        Self {
            contents: Mutex::new(None),
            denied: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.denied {
            return Err(StudioError::Clipboard {
                reason: "permission denied".to_string(),
            });
        }
        let mut contents = self.contents.lock().map_err(|_| StudioError::Clipboard {
            reason: "clipboard lock poisoned".to_string(),
        })?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
