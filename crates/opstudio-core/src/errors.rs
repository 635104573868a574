use crate::form::ValidationErrors;
use opstudio_core_types::RequestId;
use thiserror::Error;

/// Result type alias using StudioError
pub type Result<T> = std::result::Result<T, StudioError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code used in log events, CLI output and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Client-side
    Validation,
    InvalidDocument,

    // Submission flow
    SubmissionRejected,
    SubmissionInFlight,
    InvalidState,

    // Integration/IO
    Transport,
    Timeout,
    Clipboard,
    Configuration,
    Serialization,
    Io,

    // Auth
    Unauthorised,
    Forbidden,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::SubmissionRejected => "ERR_SUBMISSION_REJECTED",
            ExErrorKind::SubmissionInFlight => "ERR_SUBMISSION_IN_FLIGHT",
            ExErrorKind::InvalidState => "ERR_INVALID_STATE",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Clipboard => "ERR_CLIPBOARD",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
        }
    }

    /// Whether the user can simply try the same action again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExErrorKind::SubmissionRejected
                | ExErrorKind::SubmissionInFlight
                | ExErrorKind::Transport
                | ExErrorKind::Timeout
                | ExErrorKind::Clipboard
        )
    }
}

/// Canonical structured error type
///
/// Carries a kind plus optional context. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    status: Option<u16>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            status: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (rule name, element id, file path)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the form field the error belongs to
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add the HTTP status returned by the backend
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {})", status)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id.as_str())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for Ops Studio operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudioError {
    /// Client-side validation failed; shown inline per field
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Backend rejected the submission; shown as a top-level message
    #[error("Submission rejected: {message}")]
    Submission { status: Option<u16>, message: String },

    /// Save was triggered while a request for the same form is pending
    #[error("A submission is already in flight for this form")]
    SubmissionInFlight,

    /// Action not allowed in the current flow state
    #[error("Cannot {action} while {state}")]
    InvalidState { state: String, action: String },

    /// Clipboard write failed (e.g. permission denied)
    #[error("Clipboard unavailable: {reason}")]
    Clipboard { reason: String },

    /// Input document is not valid UTF-8 JSON
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The request never produced an HTTP response
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl StudioError {
    /// Message suitable for a top-level banner in the form
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Submission { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Conversion from StudioError to ExError
impl From<StudioError> for ExError {
    fn from(err: StudioError) -> Self {
        match err {
            StudioError::Validation(errors) => {
                let mut ex = ExError::new(ExErrorKind::Validation).with_message(errors.to_string());
                if let Some((field, _)) = errors.iter().next() {
                    ex = ex.with_field(field);
                }
                ex
            }

            StudioError::Submission { status, message } => {
                let kind = match status {
                    Some(401) => ExErrorKind::Unauthorised,
                    Some(403) => ExErrorKind::Forbidden,
                    Some(408) | Some(504) => ExErrorKind::Timeout,
                    _ => ExErrorKind::SubmissionRejected,
                };
                let ex = ExError::new(kind).with_message(message);
                match status {
                    Some(s) => ex.with_status(s),
                    None => ex,
                }
            }

            StudioError::SubmissionInFlight => ExError::new(ExErrorKind::SubmissionInFlight)
                .with_message("a submission is already in flight for this form"),

            StudioError::InvalidState { state, action } => ExError::new(ExErrorKind::InvalidState)
                .with_op(action)
                .with_message(format!("not allowed while {}", state)),

            StudioError::Clipboard { reason } => {
                ExError::new(ExErrorKind::Clipboard).with_message(reason)
            }

            StudioError::InvalidDocument { message } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(message)
            }

            StudioError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            StudioError::Transport { message } => {
                ExError::new(ExErrorKind::Transport).with_message(message)
            }

            StudioError::Configuration { message } => {
                ExError::new(ExErrorKind::Configuration).with_message(message)
            }

            StudioError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::Io {
            message: err.to_string(),
        }
    }
}
