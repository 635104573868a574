//! Rule command
//!
//! Usage: opstudio rule create [--file <JSON>] [--name <NAME>] [...] [--dry-run]

use super::read_file;
use clap::{Args, Subcommand};
use opstudio_core::errors::StudioError;
use opstudio_core::navigation::{History, HistoryNavigator};
use opstudio_core::preview;
use opstudio_core::rule::{render_rule_form, Operator, RuleCondition, RuleDraft, Severity};
use opstudio_engine::{HttpRuleTransport, RuleSubmitter, StudioConfig};
use std::path::PathBuf;
use std::sync::Arc;

/// Route of the rule form; cancel and redirect are relative to it
const NEW_RULE_ROUTE: &str = "/cep/rules/new";

#[derive(Debug, Args)]
pub struct RuleArgs {
    #[command(subcommand)]
    pub command: RuleCommand,
}

#[derive(Debug, Subcommand)]
pub enum RuleCommand {
    /// Validate a rule and submit it to the backend
    Create(RuleCreateArgs),
}

#[derive(Debug, Args)]
pub struct RuleCreateArgs {
    /// Start from a rule definition in a JSON file; flags override its values
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Event type the rule listens to, e.g. metrics.host
    #[arg(long)]
    pub event_type: Option<String>,

    /// Event attribute the condition reads, e.g. cpu.usage
    #[arg(long)]
    pub field: Option<String>,

    /// Comparison: gt, gte, lt, lte, eq, ne (or >, >=, ...)
    #[arg(long, allow_hyphen_values = true)]
    pub operator: Option<Operator>,

    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// Sliding window in seconds
    #[arg(long)]
    pub window_seconds: Option<u64>,

    /// low, medium, high or critical
    #[arg(long)]
    pub severity: Option<Severity>,

    /// Create the rule disabled
    #[arg(long)]
    pub disabled: bool,

    /// Validate and print the payload without sending it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: RuleArgs, config: &StudioConfig) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        RuleCommand::Create(create_args) => execute_create(create_args, config),
    }
}

fn execute_create(
    args: RuleCreateArgs,
    config: &StudioConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let dry_run = args.dry_run;
    let draft = build_draft(args)?;

    if let Err(errors) = draft.validate() {
        eprint!("{}", render_rule_form(&draft, Some(&errors)));
        return Err(StudioError::Validation(errors).into());
    }

    if dry_run {
        println!("{}", preview::serialize(&draft.to_payload()?));
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let transport = Arc::new(HttpRuleTransport::new(config)?);
        let navigator = Arc::new(HistoryNavigator::new(History::starting_at(NEW_RULE_ROUTE)));
        let submitter = RuleSubmitter::new(transport, navigator)
            .with_listing_route(config.listing_route.as_str());

        let response = match submitter.save(&draft).await {
            Ok(response) => response,
            // The structured error carries the request id for log correlation
            Err(err) => {
                return Err(match submitter.last_error() {
                    Some(ex) => ex.into(),
                    None => err.into(),
                })
            }
        };
        println!("✓ Rule '{}' created (status {})", draft.name, response.status);
        if !response.body.is_null() {
            println!("{}", preview::serialize(&response.body));
        }
        println!("Rule listing: {}", config.listing_route);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Merge the optional JSON file with the command-line flags
fn build_draft(args: RuleCreateArgs) -> Result<RuleDraft, Box<dyn std::error::Error>> {
    let mut draft = match &args.file {
        Some(path) => {
            let bytes = read_file(path)?;
            let text = String::from_utf8(bytes)
                .map_err(|_| format!("{} is not valid UTF-8", path.display()))?;
            RuleDraft::from_json(&preview::parse(&text)?)?
        }
        None => RuleDraft::default(),
    };

    if let Some(name) = args.name {
        draft.name = name;
    }
    if args.description.is_some() {
        draft.description = args.description;
    }
    if args.event_type.is_some() {
        draft.event_type = args.event_type;
    }
    if args.window_seconds.is_some() {
        draft.window_seconds = args.window_seconds;
    }
    if args.severity.is_some() {
        draft.severity = args.severity;
    }
    if args.disabled {
        draft.enabled = Some(false);
    }

    if args.field.is_some() || args.operator.is_some() || args.threshold.is_some() {
        let base = draft.condition.take();
        let field = args.field.or_else(|| base.as_ref().map(|c| c.field.clone()));
        let operator = args.operator.or_else(|| base.as_ref().map(|c| c.operator));
        let threshold = args.threshold.or_else(|| base.as_ref().map(|c| c.threshold));
        match (field, operator, threshold) {
            (Some(field), Some(operator), Some(threshold)) => {
                draft.condition = Some(RuleCondition {
                    field,
                    operator,
                    threshold,
                });
            }
            _ => return Err("--field, --operator and --threshold must be given together".into()),
        }
    }
    Ok(draft)
}
