//! Rule form submission state machine
//!
//! ```text
//! Idle --save--> Submitting --2xx--> Success
//!                    |
//!                    +--non-2xx / transport error--> (Failed) --> Idle
//! ```
//!
//! `Failed` is transient: the rejection is returned to the caller and kept
//! as the form's top-level message, and the machine settles back in `Idle`
//! so the user can retry. This module is pure; the async driver that talks
//! to the backend lives in `opstudio-engine`.

use crate::errors::{Result, StudioError};
use crate::form::ValidationErrors;
use crate::rule::RuleDraft;
use serde_json::Value;
use std::time::Duration;

/// Delay between a successful save and the redirect to the rule listing
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Shown when the backend rejects a rule without a `message`
pub const DEFAULT_SUBMIT_ERROR: &str = "Failed to create rule";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Success,
}

impl SubmitState {
    fn describe(&self) -> &'static str {
        match self {
            SubmitState::Idle => "idle",
            SubmitState::Submitting => "submitting",
            SubmitState::Success => "already saved",
        }
    }
}

/// Status and decoded body of the backend's reply
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: Value,
}

impl SubmitResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Message to show for a rejected submission
pub fn rejection_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_SUBMIT_ERROR)
        .to_string()
}

/// Submission state of one form instance
#[derive(Debug, Clone)]
pub struct SubmissionMachine {
    state: SubmitState,
    error: Option<String>,
    field_errors: ValidationErrors,
    attempts: u32,
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self {
            state: SubmitState::Idle,
            error: None,
            field_errors: ValidationErrors::new(),
            attempts: 0,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Top-level message from the last rejected attempt
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Inline messages from the last failed validation
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// Number of requests sent so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// `Idle -> Submitting`: validate the draft and hand back the payload to send
    ///
    /// # Errors
    ///
    /// - `SubmissionInFlight` if a request is pending
    /// - `InvalidState` once the rule has been saved
    /// - `Validation` if a field fails; the state stays `Idle`
    pub fn begin(&mut self, draft: &RuleDraft) -> Result<Value> {
        match self.state {
            SubmitState::Submitting => return Err(StudioError::SubmissionInFlight),
            SubmitState::Success => {
                return Err(StudioError::InvalidState {
                    state: self.state.describe().to_string(),
                    action: "submit".to_string(),
                })
            }
            SubmitState::Idle => {}
        }

        if let Err(errors) = draft.validate() {
            self.field_errors = errors.clone();
            return Err(StudioError::Validation(errors));
        }
        let payload = draft.to_payload()?;

        self.field_errors = ValidationErrors::new();
        self.error = None;
        self.state = SubmitState::Submitting;
        self.attempts += 1;
        Ok(payload)
    }

    /// `Submitting -> Success | Idle` from the backend's reply
    ///
    /// # Errors
    ///
    /// - `Submission` for a non-2xx reply
    /// - `InvalidState` if no request was pending
    pub fn finish(&mut self, response: &SubmitResponse) -> Result<()> {
        self.expect_submitting("complete")?;
        if response.is_success() {
            self.state = SubmitState::Success;
            return Ok(());
        }
        Err(self.reject(Some(response.status), rejection_message(&response.body)))
    }

    /// `Submitting -> Idle` when the request never got a reply
    ///
    /// # Errors
    ///
    /// Always returns the `Submission` error recorded on the form, or
    /// `InvalidState` if no request was pending
    pub fn fail(&mut self) -> Result<()> {
        self.expect_submitting("fail")?;
        Err(self.reject(None, DEFAULT_SUBMIT_ERROR.to_string()))
    }

    fn reject(&mut self, status: Option<u16>, message: String) -> StudioError {
        self.state = SubmitState::Idle;
        self.error = Some(message.clone());
        StudioError::Submission { status, message }
    }

    fn expect_submitting(&self, action: &str) -> Result<()> {
        if self.state == SubmitState::Submitting {
            Ok(())
        } else {
            Err(StudioError::InvalidState {
                state: self.state.describe().to_string(),
                action: action.to_string(),
            })
        }
    }
}
