//! Labelled input with validation and help text
//!
//! [`FieldOptions`] is the closed set of attributes a field supports. Loading
//! it from JSON rejects unknown keys instead of passing them through.

use crate::errors::{Result, StudioError};
use crate::form::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Text,
    TextArea,
    Number,
    Select,
    Switch,
}

/// Every attribute a form field accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOptions {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: InputKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Allowed values for `select` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldOptions {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: InputKind::Text,
            required: false,
            help_text: None,
            placeholder: None,
            max_length: None,
            choices: Vec::new(),
            disabled: false,
        }
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = InputKind::Select;
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Load options from an untyped attribute map
    ///
    /// # Errors
    ///
    /// `StudioError::InvalidDocument` for unknown keys or wrongly typed values
    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| StudioError::InvalidDocument {
            message: format!("invalid field options: {}", e),
        })
    }

    /// Check a raw input value against `required`, `max_length` and `choices`
    pub fn check(&self, value: Option<&str>, errors: &mut ValidationErrors) {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        match value {
            None if self.required => errors.add(&self.name, format!("{} is required", self.label)),
            None => {}
            Some(v) => {
                if let Some(max) = self.max_length {
                    if v.chars().count() > max {
                        errors.add(
                            &self.name,
                            format!("{} must be at most {} characters", self.label, max),
                        );
                    }
                }
                if self.kind == InputKind::Select && !self.choices.iter().any(|c| c == v) {
                    errors.add(
                        &self.name,
                        format!("{} must be one of: {}", self.label, self.choices.join(", ")),
                    );
                }
            }
        }
    }
}

/// A field ready to render: its options, current value and inline error
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup<'a> {
    options: &'a FieldOptions,
    value: Option<&'a str>,
    error: Option<&'a str>,
}

impl<'a> FieldGroup<'a> {
    pub fn new(options: &'a FieldOptions) -> Self {
        Self {
            options,
            value: None,
            error: None,
        }
    }

    pub fn value(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Render as terminal text: label line, input line, then the error
    /// message or, when there is none, the help text.
    pub fn render(&self) -> String {
        let o = self.options;
        let mut out = String::new();

        out.push_str(&o.label);
        if o.required {
            out.push_str(" *");
        }
        if o.disabled {
            out.push_str(" (disabled)");
        }
        out.push('\n');

        let value = self.value.filter(|v| !v.is_empty());
        match o.kind {
            InputKind::Switch => {
                let on = matches!(value, Some("true") | Some("on") | Some("1"));
                out.push_str(if on { "  [x]\n" } else { "  [ ]\n" });
            }
            _ => {
                out.push_str("  > ");
                match (value, &o.placeholder) {
                    (Some(v), _) => out.push_str(v),
                    (None, Some(p)) => out.push_str(&format!("({})", p)),
                    (None, None) => {}
                }
                if o.kind == InputKind::Select && !o.choices.is_empty() {
                    out.push_str(&format!("  [{}]", o.choices.join("|")));
                }
                out.push('\n');
            }
        }

        match (self.error, &o.help_text) {
            (Some(err), _) => out.push_str(&format!("  ! {}\n", err)),
            (None, Some(help)) => out.push_str(&format!("  ? {}\n", help)),
            (None, None) => {}
        }
        out
    }
}
