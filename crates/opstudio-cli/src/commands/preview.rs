//! Preview command
//!
//! Usage: opstudio preview <FILE> [--copy]

use super::read_file;
use crate::clipboard::SystemClipboard;
use clap::Args;
use opstudio_core::preview::{self, CopyOutcome};
use opstudio_engine::ExportController;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// JSON document to preview
    pub file: PathBuf,

    /// Also copy the preview to the system clipboard
    #[arg(long)]
    pub copy: bool,
}

pub fn execute(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_file(&args.file)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| format!("{} is not valid UTF-8", args.file.display()))?;
    let rendered = preview::serialize(&preview::parse(&text)?);
    println!("{}", rendered);

    if args.copy {
        let export = ExportController::new(Arc::new(SystemClipboard));
        // A refused clipboard is not an error; there is just no confirmation
        if export.copy_text(&rendered) == CopyOutcome::Copied {
            if let Some(label) = export.feedback_label() {
                eprintln!("{}", label);
            }
        }
    }
    Ok(())
}
