//! Human-readable summary renderer for screen diffs.

use crate::diff::model::{DiffKind, ScreenDiff};

/// Shown when neither version has any element.
pub const ZERO_STATE_MESSAGE: &str = "_No elements to compare._";

/// Shown when elements exist but none changed.
pub const NO_CHANGES_MESSAGE: &str = "_No changes between versions._";

/// Render a Markdown summary of a [`ScreenDiff`].
///
/// Always shows the four counters. Purely presentational: the diff is only read.
pub fn render_human_summary(diff: &ScreenDiff) -> String {
    let s = &diff.summary;
    let mut out = String::new();

    out.push_str("## Screen Diff\n\n");
    out.push_str("| Added | Removed | Modified | Unchanged |\n|---|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        s.added, s.removed, s.modified, s.unchanged
    ));

    if s.total() == 0 {
        out.push_str(ZERO_STATE_MESSAGE);
        out.push('\n');
        return out;
    }
    if !s.has_changes() {
        out.push_str(NO_CHANGES_MESSAGE);
        out.push('\n');
        return out;
    }

    for (kind, heading) in [
        (DiffKind::Added, "Added"),
        (DiffKind::Removed, "Removed"),
        (DiffKind::Modified, "Modified"),
    ] {
        let mut entries = diff.entries_of(kind).peekable();
        if entries.peek().is_none() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", heading));
        for entry in entries {
            if kind == DiffKind::Modified {
                out.push_str(&format!(
                    "- `{}`: {}\n",
                    entry.id,
                    describe_paths(&entry.changed_paths)
                ));
            } else {
                out.push_str(&format!("- `{}`\n", entry.id));
            }
        }
        out.push('\n');
    }

    out
}

fn describe_paths(paths: &[String]) -> String {
    match paths {
        [] => "changed".to_string(),
        [only] if only.is_empty() => "value changed".to_string(),
        _ => paths
            .iter()
            .map(|p| format!("`{}`", p))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
