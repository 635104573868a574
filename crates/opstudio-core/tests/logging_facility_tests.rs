#![allow(clippy::unwrap_used, clippy::expect_used)]

use opstudio_core::errors::{ExErrorKind, StudioError};
use opstudio_core::logging_facility::test_capture::init_test_capture;
use opstudio_core::{log_op_end, log_op_error, log_op_start};
use opstudio_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_RULE_NAME,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, rule_name = "cpu-alert");

    let events = capture.events();
    let start = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.field(FIELD_RULE_NAME), Some("cpu-alert"));
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_stable_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = StudioError::Submission {
        status: Some(400),
        message: "invalid threshold".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(error_events.len(), 1);
    assert_eq!(
        error_events[0].field(FIELD_ERR_CODE),
        Some(ExErrorKind::SubmissionRejected.code())
    );
    assert_eq!(error_events[0].field(FIELD_ERR_KIND), Some("SubmissionRejected"));
    assert_eq!(error_events[0].level, tracing::Level::ERROR);
}

#[test]
fn test_boundary_emits_single_start_and_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1, rule_name = "disk");

    let count = |event: &str| {
        capture.count_events(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(event))
    };
    assert_eq!(count(EVENT_START), 1);
    assert_eq!(count(EVENT_END), 1);
    assert_eq!(count(EVENT_END_ERROR), 0);
    assert_eq!(capture.matching(op_name, EVENT_END, FIELD_RULE_NAME, "disk").len(), 1);
}

#[test]
fn test_diff_bytes_logs_counters() {
    use opstudio_core::diff::engine::{compute_diff_bytes, DiffOptions};
    use opstudio_core_types::schema::{FIELD_ADDED, FIELD_MODIFIED, FIELD_REMOVED, FIELD_UNCHANGED};

    let capture = init_test_capture();
    let options = DiffOptions {
        id_field: "log_counter_unique_5".to_string(),
    };
    compute_diff_bytes(br#"{"a": 1, "b": 2}"#, br#"{"b": 3, "c": 4}"#, &options).unwrap();

    let ends = capture.matching("compute_diff", EVENT_END, "id_field", "log_counter_unique_5");
    assert_eq!(ends.len(), 1);
    for key in [FIELD_ADDED, FIELD_REMOVED, FIELD_MODIFIED] {
        assert_eq!(ends[0].field(key), Some("1"), "{}", key);
    }
    assert_eq!(ends[0].field(FIELD_UNCHANGED), Some("0"));
}
