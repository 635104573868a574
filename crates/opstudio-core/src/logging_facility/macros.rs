//! Boundary events for the studio's logged operations
//!
//! Three operations are logged this way: `compute_diff` (core),
//! `copy_preview` and `submit_rule` (engine). Each emits one `start` event,
//! then exactly one of `end` (with `duration_ms`) or `end_error` (with
//! `duration_ms`, `err_kind` and `err_code`). Extra fields such as
//! `rule_name` or `request_id` follow the names in
//! `opstudio_core_types::schema` so the test capture layer and log
//! consumers can match on them.
//!
//! Every event also carries `component`, the module path of the call site.

/// Emit the `start` event of an operation, with optional extra fields.
///
/// ```
/// # use opstudio_core::log_op_start;
/// log_op_start!("submit_rule");
/// log_op_start!("submit_rule", rule_name = "cpu-alert", request_id = "req-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::opstudio_core_types::schema::EVENT_START,
            $($($field)+)?
        );
    };
}

/// Emit the `end` event of an operation that succeeded.
///
/// `duration_ms` is required and comes first.
///
/// ```
/// # use opstudio_core::log_op_end;
/// log_op_end!("compute_diff", duration_ms = 3);
/// log_op_end!("compute_diff", duration_ms = 3, added = 1, removed = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::opstudio_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        );
    };
}

/// Emit the `end_error` event of an operation that failed.
///
/// Accepts anything convertible into an `ExError` (a `StudioError`, or an
/// `ExError` already tagged with op and request id) and records its kind and
/// stable code at ERROR level.
///
/// ```
/// # use opstudio_core::{log_op_error, errors::StudioError};
/// let err = StudioError::SubmissionInFlight;
/// log_op_error!("submit_rule", err, duration_ms = 10, rule_name = "cpu-alert");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::opstudio_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)+)?
        );
    }};
}
