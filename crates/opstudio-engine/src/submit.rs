//! Async driver for the rule submission flow
//!
//! Wraps one form's [`SubmissionMachine`] with the backend transport and the
//! navigator. A successful save schedules the redirect to the rule listing
//! after [`REDIRECT_DELAY`]; `cancel` goes back in history and drops a redirect
//! that has not fired yet. An in-flight request is never aborted.

use crate::transport::RuleTransport;
use opstudio_core::errors::{ExError, Result};
use opstudio_core::navigation::{Navigator, RULE_LISTING_PATH};
use opstudio_core::rule::RuleDraft;
use opstudio_core::submission::{SubmissionMachine, SubmitResponse, SubmitState, REDIRECT_DELAY};
use opstudio_core::{log_op_end, log_op_error, log_op_start};
use opstudio_core_types::RequestContext;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;

pub struct RuleSubmitter {
    machine: Mutex<SubmissionMachine>,
    transport: Arc<dyn RuleTransport>,
    navigator: Arc<dyn Navigator>,
    listing_route: String,
    redirect: Mutex<Option<JoinHandle<()>>>,
    last_error: Mutex<Option<ExError>>,
}

impl RuleSubmitter {
    pub fn new(transport: Arc<dyn RuleTransport>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            machine: Mutex::new(SubmissionMachine::new()),
            transport,
            navigator,
            listing_route: RULE_LISTING_PATH.to_string(),
            redirect: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    pub fn with_listing_route(mut self, route: impl Into<String>) -> Self {
        self.listing_route = route.into();
        self
    }

    pub fn state(&self) -> SubmitState {
        self.machine().state()
    }

    /// Top-level banner text from the last rejected attempt
    pub fn error_message(&self) -> Option<String> {
        self.machine().error_message().map(str::to_string)
    }

    /// Structured form of the last failed save, tagged with its request id
    ///
    /// Cleared by the next successful save.
    pub fn last_error(&self) -> Option<ExError> {
        self.last_error_slot().clone()
    }

    /// Snapshot of the underlying machine, for rendering the form
    pub fn snapshot(&self) -> SubmissionMachine {
        self.machine().clone()
    }

    /// Validate and send the draft.
    ///
    /// On a 2xx reply the redirect to the listing route is scheduled; the
    /// returned response carries the backend's body (e.g. the new rule id).
    ///
    /// # Errors
    ///
    /// - `Validation` when a field fails; nothing is sent
    /// - `SubmissionInFlight` while another save of this form is pending
    /// - `InvalidState` once the rule has been saved
    /// - `Submission` when the backend rejects the rule or cannot be reached
    pub async fn save(&self, draft: &RuleDraft) -> Result<SubmitResponse> {
        let start = Instant::now();
        let ctx = RequestContext::new();
        log_op_start!(
            "submit_rule",
            rule_name = draft.name.as_str(),
            request_id = ctx.request_id.as_str()
        );

        let result = self.send(draft, &ctx).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(response) => {
                log_op_end!(
                    "submit_rule",
                    duration_ms = duration_ms,
                    rule_name = draft.name.as_str(),
                    request_id = ctx.request_id.as_str(),
                    http_status = response.status
                );
                *self.last_error_slot() = None;
            }
            Err(err) => {
                let ex = ExError::from(err.clone())
                    .with_op("submit_rule")
                    .with_entity_id(draft.name.as_str())
                    .with_request_id(ctx.request_id.clone());
                log_op_error!(
                    "submit_rule",
                    ex.clone(),
                    duration_ms = duration_ms,
                    rule_name = draft.name.as_str(),
                    request_id = ctx.request_id.as_str()
                );
                *self.last_error_slot() = Some(ex);
            }
        }
        result
    }

    async fn send(&self, draft: &RuleDraft, ctx: &RequestContext) -> Result<SubmitResponse> {
        let payload = self.machine().begin(draft)?;

        match self.transport.post_rule(&payload, ctx).await {
            Ok(response) => {
                self.machine().finish(&response)?;
                self.schedule_redirect();
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(
                    request_id = ctx.request_id.as_str(),
                    error = %err,
                    "rule submission did not reach the backend"
                );
                Err(self.machine().fail().err().unwrap_or(err))
            }
        }
    }

    fn schedule_redirect(&self) {
        let navigator = Arc::clone(&self.navigator);
        let route = self.listing_route.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_DELAY).await;
            navigator.push(&route);
        });
        if let Some(previous) = self.redirect_slot().replace(handle) {
            previous.abort();
        }
    }

    /// Go back to the previous view
    ///
    /// Works in any state. A scheduled redirect that has not fired is dropped.
    pub fn cancel(&self) {
        if let Some(handle) = self.redirect_slot().take() {
            handle.abort();
            tracing::debug!("pending redirect dropped");
        }
        self.navigator.back();
    }

    /// Whether a redirect is scheduled and has not fired yet
    pub fn redirect_pending(&self) -> bool {
        self.redirect_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait until the scheduled redirect has fired.
    ///
    /// Returns `false` if none was scheduled or it was dropped.
    pub async fn wait_for_redirect(&self) -> bool {
        let handle = self.redirect_slot().take();
        match handle {
            Some(handle) => handle.await.is_ok(),
            None => false,
        }
    }

    fn machine(&self) -> MutexGuard<'_, SubmissionMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn last_error_slot(&self) -> MutexGuard<'_, Option<ExError>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn redirect_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.redirect.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RuleSubmitter {
    fn drop(&mut self) {
        // The redirect belongs to this form; do not navigate after it is gone
        if let Some(handle) = self.redirect_slot().take() {
            handle.abort();
        }
    }
}
