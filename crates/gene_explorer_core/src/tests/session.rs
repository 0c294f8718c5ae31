//! Tests for report session handling
//!
//! These tests verify:
//! - An existing session tagged with the explorer's context is reused
//! - A session is created when none matches
//! - An expired session is recreated and the identical request re-sent
//! - The retry policy bounds how often that happens

use super::support::{Harness, MockHost, SEEDED_SESSION};
use crate::config::ExplorerConfig;
use crate::error::ServiceError;
use crate::lifecycle::{CycleOutcome, RetryPolicy};
use crate::model::{SessionHandle, SessionInfo};
use crate::report::{ExecuteResponse, SESSION_INVALID_MARKER};

fn expired() -> Result<ExecuteResponse, ServiceError> {
    Ok(ExecuteResponse::with_errors([format!(
        "{SESSION_INVALID_MARKER}: it may have timed out"
    )]))
}

fn with_policy(host: MockHost, retry_policy: RetryPolicy) -> Harness {
    let config = ExplorerConfig {
        retry_policy,
        ..Default::default()
    };
    Harness::with(host, config)
}

#[test]
fn test_existing_session_reused() {
    let h = Harness::new();
    assert_eq!(
        h.controller.session(),
        Some(&SessionHandle::new(SEEDED_SESSION))
    );
    assert_eq!(h.host.created_count(), 0);
}

#[test]
fn test_foreign_sessions_ignored() {
    let host = MockHost::new().without_sessions();
    host.sessions.borrow_mut().push(SessionInfo {
        id: SessionHandle::new("someone-else"),
        context: "OtherModule".to_string(),
    });
    let h = Harness::with(host, Default::default());

    assert_eq!(h.host.created_count(), 1);
    assert_eq!(h.controller.session(), Some(&SessionHandle::new("session-1")));
}

#[test]
fn test_session_list_failure_reported() {
    let host = MockHost::new();
    host.fail_session_list.set(true);
    let h = Harness::with(host, Default::default());

    assert!(h.controller.session().is_none());
    assert_eq!(h.failures.count(), 1);
    assert!(h.failures.last().unwrap().contains("HTTP 500"));
}

#[test]
fn test_submit_before_session_sends_none() {
    let host = MockHost::new();
    host.fail_session_list.set(true);
    let mut h = Harness::with(host, Default::default());
    h.fill_required();
    h.submit();

    assert_eq!(h.host.executed.borrow()[0].session, None);
}

#[test]
fn test_expired_session_recreated_once() {
    let mut h = Harness::new();
    h.fill_required();
    h.host.script_execute(expired());
    h.submit();

    assert_eq!(h.host.created_count(), 1);
    assert_eq!(h.host.executed_count(), 2);

    let executed = h.host.executed.borrow();
    assert_eq!(executed[0].request, executed[1].request);
    assert_eq!(executed[0].session, Some(SessionHandle::new(SEEDED_SESSION)));
    assert_eq!(executed[1].session, Some(SessionHandle::new("session-1")));

    assert_eq!(h.controller.session(), Some(&SessionHandle::new("session-1")));
    assert!(!h.controller.is_running());
    assert!(h.controller.display().image().is_some());
    assert_eq!(h.failures.count(), 0);
}

#[test]
fn test_second_expiry_reported_with_default_policy() {
    let mut h = Harness::new();
    h.fill_required();
    h.host.script_execute(expired());
    h.host.script_execute(expired());
    h.submit();

    assert_eq!(h.host.created_count(), 1);
    assert_eq!(h.host.executed_count(), 2);
    assert!(!h.controller.is_running());
    assert_eq!(h.failures.count(), 1);
    assert!(h.failures.last().unwrap().contains(SESSION_INVALID_MARKER));
}

#[test]
fn test_no_retry_when_disabled() {
    let mut h = with_policy(MockHost::new(), RetryPolicy::Limited { max_retries: 0 });
    h.fill_required();
    h.host.script_execute(expired());
    h.submit();

    assert_eq!(h.host.created_count(), 0);
    assert_eq!(h.host.executed_count(), 1);
    assert!(matches!(
        h.controller.last_outcome(),
        Some(CycleOutcome::Failed(_))
    ));
}

#[test]
fn test_unbounded_policy_keeps_retrying() {
    let mut h = with_policy(MockHost::new(), RetryPolicy::Unbounded);
    h.fill_required();
    for _ in 0..3 {
        h.host.script_execute(expired());
    }
    h.submit();

    assert_eq!(h.host.created_count(), 3);
    assert_eq!(h.host.executed_count(), 4);
    assert!(h.controller.display().image().is_some());
    assert_eq!(h.failures.count(), 0);
}

#[test]
fn test_retry_budget_resets_per_submit() {
    let mut h = Harness::new();
    h.fill_required();
    h.host.script_execute(expired());
    h.submit();
    h.host.script_execute(expired());
    h.submit();

    assert_eq!(h.host.created_count(), 2);
    assert_eq!(h.host.executed_count(), 4);
    assert_eq!(h.failures.count(), 0);
}

#[test]
fn test_recreate_failure_unlocks() {
    let mut h = Harness::new();
    h.fill_required();
    h.host.script_execute(expired());
    h.host.fail_session_create.set(true);
    h.submit();

    assert_eq!(h.host.executed_count(), 1);
    assert!(!h.controller.is_running());
    assert!(h.controller.phase().is_idle());
    assert!(h.failures.last().unwrap().contains("connection reset"));
}

#[test]
fn test_marker_in_later_error_is_not_expiry() {
    let mut h = Harness::new();
    h.fill_required();
    h.host.script_execute(Ok(ExecuteResponse::with_errors([
        "Error in library(ggplot2)".to_string(),
        SESSION_INVALID_MARKER.to_string(),
    ])));
    h.submit();

    assert_eq!(h.host.created_count(), 0);
    assert_eq!(h.failures.count(), 1);
}
