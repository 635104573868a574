pub mod diff;
pub mod preview;
pub mod prompts;
pub mod rule;

use std::path::Path;

/// Read a file, naming it in the error
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    std::fs::read(path).map_err(|e| format!("cannot read {}: {}", path.display(), e).into())
}
