//! Prompts command
//!
//! Usage: opstudio prompts [--json]

use clap::Args;
use opstudio_core::preview;
use opstudio_core::PromptCatalog;

#[derive(Debug, Args)]
pub struct PromptsArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PromptsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = PromptCatalog::global();

    if args.json {
        println!("{}", preview::serialize(&serde_json::to_value(catalog.all())?));
        return Ok(());
    }

    let width = catalog.all().iter().map(|p| p.label.len()).max().unwrap_or(0);
    for prompt in catalog.all() {
        println!(
            "{:<width$}  {}  [{}]",
            prompt.label,
            prompt.prompt,
            prompt.icon,
            width = width
        );
    }
    Ok(())
}
