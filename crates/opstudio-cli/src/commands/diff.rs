//! Diff command
//!
//! Usage: opstudio diff <BEFORE> <AFTER> [--json] [--id-field <NAME>]

use super::read_file;
use clap::Args;
use opstudio_core::diff::engine::{compute_diff_bytes, DiffOptions};
use opstudio_core::diff::render_human_summary;
use opstudio_core::preview;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Earlier version of the screen definition (JSON)
    pub before: PathBuf,

    /// Later version of the screen definition (JSON)
    pub after: PathBuf,

    /// Print the structured diff as JSON instead of the Markdown summary
    #[arg(long)]
    pub json: bool,

    /// Field carrying the element id in array-shaped documents
    #[arg(long, default_value = "id")]
    pub id_field: String,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let before = read_file(&args.before)?;
    let after = read_file(&args.after)?;

    let options = DiffOptions {
        id_field: args.id_field,
    };
    let diff = compute_diff_bytes(&before, &after, &options)?;

    if args.json {
        println!("{}", preview::serialize(&serde_json::to_value(&diff)?));
    } else {
        print!("{}", render_human_summary(&diff));
    }
    Ok(())
}
