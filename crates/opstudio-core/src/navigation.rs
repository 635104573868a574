//! Navigation boundary
//!
//! The routing framework is external; the submission flow only needs to
//! push a route or go back one entry. [`HistoryNavigator`] keeps an
//! in-process history stack for headless use and tests.

use std::sync::Mutex;

/// Route of the CEP rule listing
pub const RULE_LISTING_PATH: &str = "/cep/rules";

pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);

    /// Return to the previous view
    fn back(&self);
}

/// Ordered stack of visited paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            entries: vec![path.into()],
        }
    }

    pub fn push(&mut self, path: impl Into<String>) {
        self.entries.push(path.into());
    }

    /// Drop the current entry and return the one now current.
    ///
    /// The first entry is never dropped; going back from it returns `None`.
    pub fn back(&mut self) -> Option<&str> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<History>,
}

impl HistoryNavigator {
    pub fn new(history: History) -> Self {
        Self {
            history: Mutex::new(history),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .ok()
            .and_then(|h| h.current().map(str::to_string))
    }

    pub fn snapshot(&self) -> History {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, path: &str) {
        if let Ok(mut history) = self.history.lock() {
            tracing::debug!(route = path, "navigate");
            history.push(path);
        }
    }

    fn back(&self) {
        if let Ok(mut history) = self.history.lock() {
            let now = history.back().map(str::to_string);
            tracing::debug!(route = ?now, "navigate back");
        }
    }
}
