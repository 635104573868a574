//! Rule form flow without a backend: draft from JSON, validation, machine.

use opstudio_core::errors::{ExError, ExErrorKind, StudioError};
use opstudio_core::rule::{render_rule_form, RuleDraft};
use opstudio_core::submission::{SubmissionMachine, SubmitResponse, SubmitState};
use serde_json::json;

fn cpu_alert() -> RuleDraft {
    RuleDraft::from_json(&json!({
        "name": "cpu-alert",
        "event_type": "metrics.host",
        "condition": {"field": "cpu.usage", "operator": "gt", "threshold": 90.0},
        "window_seconds": 300,
        "severity": "high",
        "enabled": true,
        "actions": ["notify:oncall"]
    }))
    .unwrap()
}

#[test]
fn test_draft_payload_round_trips_through_machine() {
    let draft = cpu_alert();
    let mut machine = SubmissionMachine::new();

    let payload = machine.begin(&draft).unwrap();
    assert_eq!(RuleDraft::from_json(&payload).unwrap(), draft);

    machine
        .finish(&SubmitResponse::new(201, json!({"id": "rule-1"})))
        .unwrap();
    assert_eq!(machine.state(), SubmitState::Success);
}

#[test]
fn test_invalid_draft_renders_inline_errors_and_sends_nothing() {
    let draft = RuleDraft::from_json(&json!({
        "name": "x".repeat(101),
        "severity": "low",
        "window_seconds": 90000
    }))
    .unwrap();
    let mut machine = SubmissionMachine::new();

    let err = machine.begin(&draft).unwrap_err();
    let StudioError::Validation(errors) = &err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert_eq!(machine.attempts(), 0);

    let form = render_rule_form(&draft, Some(errors));
    assert!(form.contains("  ! Name must be at most 100 characters"));
    assert!(form.contains("  ! Window must be between 1 and 86400 seconds"));

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::Validation);
}

#[test]
fn test_backend_rejection_then_retry_succeeds() {
    let draft = cpu_alert();
    let mut machine = SubmissionMachine::new();

    machine.begin(&draft).unwrap();
    let err = machine
        .finish(&SubmitResponse::new(400, json!({"message": "invalid threshold"})))
        .unwrap_err();
    assert_eq!(err.user_message(), "invalid threshold");
    assert!(ExError::from(err).kind().is_retryable());

    machine.begin(&draft).unwrap();
    machine.finish(&SubmitResponse::new(200, json!({}))).unwrap();
    assert_eq!(machine.attempts(), 2);
    assert!(machine.error_message().is_none());
}

#[test]
fn test_unauthorised_reply_maps_to_auth_kind() {
    let mut machine = SubmissionMachine::new();
    machine.begin(&cpu_alert()).unwrap();
    let err = machine
        .finish(&SubmitResponse::new(401, json!({})))
        .unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::Unauthorised);
    assert_eq!(ex.status(), Some(401));
    assert_eq!(ex.message(), "Failed to create rule");
}
