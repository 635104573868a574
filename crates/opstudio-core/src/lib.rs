//! Ops Studio Core - pure domain layer of the studio's builder flows
//!
//! - Screen diffing between versions, with a Markdown summary
//! - Canonical JSON preview and clipboard export
//! - Typed form fields and the CEP rule form
//! - The rule submission state machine
//! - Navigation history, example prompts, error and logging facilities
//!
//! Nothing here performs network I/O; see `opstudio-engine` for that.

pub mod clipboard;
pub mod diff;
pub mod errors;
pub mod form;
pub mod logging_facility;
pub mod navigation;
pub mod preview;
pub mod prompts;
pub mod rule;
pub mod submission;

#[doc(hidden)]
pub use opstudio_core_types;

// Re-export commonly used types
pub use clipboard::{Clipboard, MemoryClipboard};
pub use diff::{compute_diff, render_human_summary, ScreenDiff};
pub use errors::{ExError, ExErrorKind, Result, StudioError};
pub use navigation::{History, HistoryNavigator, Navigator, RULE_LISTING_PATH};
pub use prompts::{ExamplePrompt, PromptCatalog};
pub use rule::RuleDraft;
pub use submission::{SubmissionMachine, SubmitResponse, SubmitState};
