//! Ops Studio Engine - I/O layer
//!
//! Drives the pure flows from `opstudio-core` against the outside world:
//! configuration, the rule backend over HTTP, the delayed redirect after a
//! save, and clipboard export with timed feedback.

pub mod config;
pub mod export;
pub mod submit;
pub mod transport;

pub use crate::config::StudioConfig;
pub use export::ExportController;
pub use submit::RuleSubmitter;
pub use transport::{HttpRuleTransport, RuleTransport};
