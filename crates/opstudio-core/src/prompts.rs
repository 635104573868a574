//! Example prompts offered on the studio's start screen
//!
//! The table is fixed at compile time and exposed through a [`PromptCatalog`]
//! created once per process. Consumers take `&PromptCatalog` rather than
//! reaching for the static directly.

use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamplePrompt {
    pub label: &'static str,
    pub prompt: &'static str,
    pub icon: &'static str,
}

const EXAMPLE_PROMPTS: &[ExamplePrompt] = &[
    ExamplePrompt {
        label: "CPU alert",
        prompt: "Alert me when average CPU usage on any host stays above 90% for 5 minutes",
        icon: "cpu",
    },
    ExamplePrompt {
        label: "Error spike",
        prompt: "Create a rule that fires when HTTP 5xx responses exceed 50 per minute",
        icon: "alert-triangle",
    },
    ExamplePrompt {
        label: "Login anomaly",
        prompt: "Flag users with more than 5 failed logins within 10 minutes",
        icon: "shield",
    },
    ExamplePrompt {
        label: "Disk capacity",
        prompt: "Warn when free disk space drops below 10% on database nodes",
        icon: "hard-drive",
    },
    ExamplePrompt {
        label: "Ops dashboard",
        prompt: "Build a dashboard screen showing latency, throughput and error rate per service",
        icon: "layout-dashboard",
    },
];

/// Read-only view over the example prompts
#[derive(Debug)]
pub struct PromptCatalog {
    prompts: &'static [ExamplePrompt],
}

static CATALOG: OnceLock<PromptCatalog> = OnceLock::new();

impl PromptCatalog {
    /// The process-wide catalog, built on first use
    pub fn global() -> &'static PromptCatalog {
        CATALOG.get_or_init(|| PromptCatalog {
            prompts: EXAMPLE_PROMPTS,
        })
    }

    pub fn all(&self) -> &[ExamplePrompt] {
        self.prompts
    }

    pub fn find(&self, label: &str) -> Option<&ExamplePrompt> {
        self.prompts
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(label))
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
