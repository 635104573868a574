//! Screen diff output types.
//!
//! Entries are only built through the kind-specific constructors on
//! [`DiffEntry`], which keep `before`/`after` presence consistent with `kind`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id used for the single entry of a whole-document comparison.
pub const WHOLE_DOCUMENT_ID: &str = "$";

/// Comparison result for one element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Present only in the newer version
    Added,
    /// Present only in the older version
    Removed,
    /// Present in both, payload differs
    Modified,
    /// Present in both, payload deep-equal
    Unchanged,
}

impl DiffKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiffKind::Added => "added",
            DiffKind::Removed => "removed",
            DiffKind::Modified => "modified",
            DiffKind::Unchanged => "unchanged",
        }
    }
}

/// Aggregate counters over all compared elements.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    /// Number of compared elements
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified + self.unchanged
    }

    /// True when at least one element was added, removed or modified
    pub fn has_changes(&self) -> bool {
        self.added + self.removed + self.modified > 0
    }

    fn record(&mut self, kind: DiffKind) {
        match kind {
            DiffKind::Added => self.added += 1,
            DiffKind::Removed => self.removed += 1,
            DiffKind::Modified => self.modified += 1,
            DiffKind::Unchanged => self.unchanged += 1,
        }
    }
}

/// One element-level comparison result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffEntry {
    /// Stable element identifier
    pub id: String,
    pub kind: DiffKind,
    /// Payload in the older version (absent for `added`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Payload in the newer version (absent for `removed`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    /// JSON pointers (relative to the element) of differing leaves; `modified` only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_paths: Vec<String>,
}

impl DiffEntry {
    pub fn added(id: impl Into<String>, after: Value) -> Self {
        Self {
            id: id.into(),
            kind: DiffKind::Added,
            before: None,
            after: Some(after),
            changed_paths: Vec::new(),
        }
    }

    pub fn removed(id: impl Into<String>, before: Value) -> Self {
        Self {
            id: id.into(),
            kind: DiffKind::Removed,
            before: Some(before),
            after: None,
            changed_paths: Vec::new(),
        }
    }

    pub fn modified(
        id: impl Into<String>,
        before: Value,
        after: Value,
        changed_paths: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: DiffKind::Modified,
            before: Some(before),
            after: Some(after),
            changed_paths,
        }
    }

    pub fn unchanged(id: impl Into<String>, before: Value, after: Value) -> Self {
        Self {
            id: id.into(),
            kind: DiffKind::Unchanged,
            before: Some(before),
            after: Some(after),
            changed_paths: Vec::new(),
        }
    }

    /// Whether `before`/`after` presence matches `kind`.
    ///
    /// Always true for constructor-built entries; checked on deserialized input.
    pub fn is_consistent(&self) -> bool {
        match self.kind {
            DiffKind::Added => self.before.is_none() && self.after.is_some(),
            DiffKind::Removed => self.before.is_some() && self.after.is_none(),
            DiffKind::Modified | DiffKind::Unchanged => {
                self.before.is_some() && self.after.is_some()
            }
        }
    }
}

/// The structured diff between two versions of a screen definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScreenDiff {
    pub summary: DiffSummary,
    pub entries: Vec<DiffEntry>,
}

impl ScreenDiff {
    /// Build a diff whose summary is derived from `entries`.
    pub fn from_entries(entries: Vec<DiffEntry>) -> Self {
        Self {
            summary: count(&entries),
            entries,
        }
    }

    pub fn entries_of(&self, kind: DiffKind) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn entry(&self, id: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Counters agree with the entries and every entry is consistent.
    pub fn is_consistent(&self) -> bool {
        self.summary == count(&self.entries) && self.entries.iter().all(DiffEntry::is_consistent)
    }
}

fn count(entries: &[DiffEntry]) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for entry in entries {
        summary.record(entry.kind);
    }
    summary
}
