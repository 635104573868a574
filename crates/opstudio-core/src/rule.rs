//! CEP rule definitions as built by the rule form
//!
//! A [`RuleDraft`] is what the user has filled in. Only populated fields are
//! sent, so a draft with just a name posts `{"name": "..."}`.

use crate::errors::{Result, StudioError};
use crate::form::{FieldGroup, FieldOptions, InputKind, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
/// Longest accepted evaluation window (one day)
pub const WINDOW_MAX_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown severity `{}`", s))
    }
}

/// Comparison applied between an event field and the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Eq,
        Operator::Ne,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    /// Accepts either the name (`gte`) or the symbol (`>=`)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s) || op.symbol() == s)
            .ok_or_else(|| format!("unknown operator `{}`", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleCondition {
    /// Event attribute the condition reads, e.g. `cpu.usage`
    pub field: String,
    pub operator: Operator,
    pub threshold: f64,
}

/// A rule definition as entered in the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RuleCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl RuleDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// `StudioError::InvalidDocument` for unknown keys or wrongly typed values
    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| StudioError::InvalidDocument {
            message: format!("invalid rule definition: {}", e),
        })
    }

    /// Client-side checks run before anything is sent
    ///
    /// # Errors
    ///
    /// One message per failing field
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = rule_form_fields();
        for options in &fields {
            let value = self.field_value(&options.name);
            options.check(value.as_deref(), &mut errors);
        }

        if let Some(condition) = &self.condition {
            if condition.field.trim().is_empty() {
                errors.add("condition_field", "Condition field is required");
            }
            if !condition.threshold.is_finite() {
                errors.add("threshold", "Threshold must be a finite number");
            }
        }
        if let Some(window) = self.window_seconds {
            if window == 0 || window > WINDOW_MAX_SECONDS {
                errors.add(
                    "window_seconds",
                    format!("Window must be between 1 and {} seconds", WINDOW_MAX_SECONDS),
                );
            }
        }
        if self.actions.iter().any(|a| a.trim().is_empty()) {
            errors.add("actions", "Actions must not be blank");
        }

        errors.into_result()
    }

    /// JSON body for `POST /api/cep/rules`
    ///
    /// # Errors
    ///
    /// `StudioError::Serialization` if the draft cannot be encoded
    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Current value of a form field, as the text the input shows
    pub fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "description" => self.description.clone(),
            "event_type" => self.event_type.clone(),
            "condition_field" => self.condition.as_ref().map(|c| c.field.clone()),
            "operator" => self
                .condition
                .as_ref()
                .map(|c| c.operator.as_str().to_string()),
            "threshold" => self.condition.as_ref().map(|c| c.threshold.to_string()),
            "window_seconds" => self.window_seconds.map(|w| w.to_string()),
            "severity" => self.severity.map(|s| s.as_str().to_string()),
            "enabled" => self.enabled.map(|e| e.to_string()),
            _ => None,
        }
    }
}

/// Field layout of the CEP rule form
pub fn rule_form_fields() -> Vec<FieldOptions> {
    vec![
        FieldOptions::new("name", "Name")
            .required()
            .max_length(NAME_MAX_LEN)
            .placeholder("cpu-alert")
            .help("Unique name shown in the rule list"),
        FieldOptions::new("description", "Description")
            .kind(InputKind::TextArea)
            .max_length(DESCRIPTION_MAX_LEN),
        FieldOptions::new("event_type", "Event type")
            .placeholder("metrics.host")
            .help("Events this rule listens to"),
        FieldOptions::new("condition_field", "Condition field").placeholder("cpu.usage"),
        FieldOptions::new("operator", "Operator").choices(Operator::ALL.map(|o| o.as_str())),
        FieldOptions::new("threshold", "Threshold").kind(InputKind::Number),
        FieldOptions::new("window_seconds", "Window (seconds)")
            .kind(InputKind::Number)
            .help("Sliding window the condition is evaluated over"),
        FieldOptions::new("severity", "Severity").choices(Severity::ALL.map(|s| s.as_str())),
        FieldOptions::new("enabled", "Enabled").kind(InputKind::Switch),
    ]
}

/// Render the whole rule form with inline errors
pub fn render_rule_form(draft: &RuleDraft, errors: Option<&ValidationErrors>) -> String {
    let fields = rule_form_fields();
    let mut out = String::new();
    for options in &fields {
        let value = draft.field_value(&options.name);
        let error = errors.and_then(|e| e.get(&options.name));
        out.push_str(
            &FieldGroup::new(options)
                .value(value.as_deref())
                .error(error)
                .render(),
        );
    }
    out
}
