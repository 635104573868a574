//! Ops Studio CLI
//!
//! Command-line access to the studio's builder flows

use clap::{Parser, Subcommand};
use opstudio_core::logging_facility;
use opstudio_engine::StudioConfig;
use std::path::PathBuf;

mod clipboard;
mod commands;

#[derive(Debug, Parser)]
#[command(name = "opstudio")]
#[command(about = "Ops Studio - screen diffs, JSON previews and CEP rules", long_about = None)]
struct Cli {
    /// Configuration file (default: ./opstudio.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two versions of a screen definition
    Diff(commands::diff::DiffArgs),
    /// Pretty-print a JSON document in canonical form
    Preview(commands::preview::PreviewArgs),
    /// CEP rule operations
    Rule(commands::rule::RuleArgs),
    /// List the example prompts
    Prompts(commands::prompts::PromptsArgs),
}

fn main() {
    let cli = Cli::parse();

    // Only `rule` needs the configuration; other commands run with defaults
    // when it cannot be loaded
    let config = StudioConfig::load(cli.config.as_deref());
    let profile = config
        .as_ref()
        .ok()
        .and_then(|c| c.profile().ok())
        .unwrap_or_default();
    logging_facility::init(profile);

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Preview(args) => commands::preview::execute(args),
        Commands::Rule(args) => match config {
            Ok(config) => commands::rule::execute(args, &config),
            Err(e) => Err(e.into()),
        },
        Commands::Prompts(args) => commands::prompts::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
