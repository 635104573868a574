//! Rule backend transport
//!
//! [`RuleTransport`] is the seam between the submission driver and the
//! network. [`HttpRuleTransport`] talks to the real backend with `reqwest`.

use crate::config::StudioConfig;
use async_trait::async_trait;
use opstudio_core::errors::{Result, StudioError};
use opstudio_core::submission::SubmitResponse;
use opstudio_core_types::{RequestContext, Sensitive, REQUEST_ID_HEADER};
use serde_json::Value;

/// Path of the rule creation endpoint, relative to the API origin
pub const RULES_API_PATH: &str = "/api/cep/rules";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleTransport: Send + Sync {
    /// Send a rule payload and return whatever the backend answered.
    ///
    /// A non-2xx reply is still `Ok`; the state machine decides what it means.
    ///
    /// # Errors
    ///
    /// `StudioError::Transport` when no HTTP response was received
    async fn post_rule(&self, payload: &Value, ctx: &RequestContext) -> Result<SubmitResponse>;
}

pub struct HttpRuleTransport {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<Sensitive<String>>,
}

impl HttpRuleTransport {
    /// # Errors
    ///
    /// `StudioError::Configuration` if the HTTP client cannot be built
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| StudioError::Configuration {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: config.rules_endpoint(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RuleTransport for HttpRuleTransport {
    async fn post_rule(&self, payload: &Value, ctx: &RequestContext) -> Result<SubmitResponse> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(REQUEST_ID_HEADER, ctx.request_id.as_str())
            .json(payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;

        // Error pages are often HTML; the machine falls back to its default message
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        tracing::debug!(
            endpoint = %self.endpoint,
            request_id = %ctx.request_id,
            http_status = status,
            "rule backend replied"
        );
        Ok(SubmitResponse::new(status, body))
    }
}

fn transport_error(err: reqwest::Error) -> StudioError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect to rule backend: {}", err)
    } else {
        err.to_string()
    };
    StudioError::Transport { message }
}
