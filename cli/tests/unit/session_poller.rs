//! Presigned login, readiness polling and session grouping.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use studio_common::{Owner, OwnerKind, ResourceType, Terminal, UserProfile};
use studioctl::application::services::session_poller::{presign_request, sessions_for};
use studioctl::domain::sessions::{UNKNOWN_KEY, kernel_metrics};
use studioctl::domain::{PollError, PollPolicy, PresignRequest, RetryPolicy};

use crate::mocks::{FakeControlPlane, FakeRuntime, RecordingReporter, RuntimeUnreachable, raw_session};

const AUTH_URL: &str = "https://d-abc.studio.us-east-1.sagemaker.aws/auth?token=secret";
const BASE_URL: &str = "https://d-abc.studio.us-east-1.sagemaker.aws";

fn poll(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_attempts,
    }
}

fn retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

fn owner(kind: OwnerKind, name: &str) -> Owner {
    Owner {
        region: "us-east-1".to_string(),
        domain_id: "d-abc".to_string(),
        owner_type: kind,
        owner: name.to_string(),
    }
}

fn user_profile(domain_id: &str, name: &str) -> UserProfile {
    UserProfile {
        region: "us-east-1".to_string(),
        domain_id: domain_id.to_string(),
        user_profile_name: name.to_string(),
        user_profile_arn: String::new(),
        status: "InService".to_string(),
        execution_role: None,
        sso_id: None,
        in_vpc: false,
    }
}

fn user_request() -> PresignRequest {
    presign_request(&owner(OwnerKind::User, "alice"), None, &[]).unwrap()
}

fn control_plane() -> FakeControlPlane {
    FakeControlPlane {
        presigned_url: Some(AUTH_URL.to_string()),
        ..FakeControlPlane::default()
    }
}

// ── presign_request ───────────────────────────────────────────────────────────

#[test]
fn test_user_signs_in_as_itself() {
    let req = user_request();
    assert_eq!(req.user_profile_name, "alice");
    assert_eq!(req.space_name, None);
    assert_eq!(req.region, "us-east-1");
}

#[test]
fn test_space_uses_named_user() {
    let req = presign_request(&owner(OwnerKind::SharedSpace, "team"), Some("carol"), &[]).unwrap();
    assert_eq!(req.user_profile_name, "carol");
    assert_eq!(req.space_name.as_deref(), Some("team"));
}

#[test]
fn test_space_defaults_to_first_profile_of_its_domain() {
    let profiles = [
        user_profile("d-other", "zed"),
        user_profile("d-abc", "bob"),
        user_profile("d-abc", "alice"),
    ];
    let req = presign_request(&owner(OwnerKind::SharedSpace, "team"), None, &profiles).unwrap();
    assert_eq!(req.user_profile_name, "bob");
}

#[test]
fn test_space_without_profiles_is_an_error() {
    let profiles = [user_profile("d-other", "zed")];
    let err = presign_request(&owner(OwnerKind::SharedSpace, "team"), None, &profiles).unwrap_err();
    assert_eq!(
        err,
        PollError::NoUserForSpace {
            domain_id: "d-abc".to_string(),
            space: "team".to_string(),
        }
    );
}

// ── sessions_for ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_xsrf_cookie_skips_polling() {
    let cp = control_plane();
    let runtime = FakeRuntime {
        xsrf_after_login: true,
        ..FakeRuntime::default()
    };
    let reporter = RecordingReporter::default();

    sessions_for(&cp, &runtime, &user_request(), &poll(3), &retry(), &reporter)
        .await
        .unwrap();

    assert_eq!(*runtime.logins.borrow(), [AUTH_URL]);
    assert_eq!(runtime.status_polls.get(), 0);
    assert!(runtime.fetched.borrow().is_empty());
    assert!(reporter.messages.borrow().is_empty());
}

#[tokio::test]
async fn test_polls_until_in_service_then_opens_jupyter() {
    let cp = control_plane();
    let runtime = FakeRuntime::with_statuses(&["", "Pending", "InService"]);
    let reporter = RecordingReporter::default();

    sessions_for(&cp, &runtime, &user_request(), &poll(10), &retry(), &reporter)
        .await
        .unwrap();

    assert_eq!(runtime.status_polls.get(), 3);
    let fetched = runtime.fetched.borrow();
    assert_eq!(
        fetched.first().map(String::as_str),
        Some(format!("{BASE_URL}/app?appType=JupyterServer&appName=default").as_str())
    );
    assert_eq!(
        fetched.last().map(String::as_str),
        Some(format!("{BASE_URL}/jupyter/default").as_str())
    );
    assert_eq!(reporter.messages.borrow().len(), 1);
}

#[tokio::test]
async fn test_poll_gives_up_after_max_attempts() {
    let cp = control_plane();
    let runtime = FakeRuntime::default();

    let err = sessions_for(
        &cp,
        &runtime,
        &user_request(),
        &poll(4),
        &retry(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err, PollError::Timeout { attempts: 4 });
    assert_eq!(runtime.status_polls.get(), 4);
}

#[tokio::test]
async fn test_gateway_errors_while_starting_keep_polling() {
    let cp = control_plane();
    let runtime = FakeRuntime::with_statuses(&["Pending", "InService"]);
    runtime.failing_polls.set(2);

    sessions_for(&cp, &runtime, &user_request(), &poll(5), &retry(), &RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(runtime.status_polls.get(), 4);
}

#[tokio::test]
async fn test_status_errors_count_against_the_attempts() {
    let cp = control_plane();
    let runtime = FakeRuntime::with_statuses(&["InService"]);
    runtime.failing_polls.set(10);

    let err = sessions_for(
        &cp,
        &runtime,
        &user_request(),
        &poll(3),
        &retry(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err, PollError::Timeout { attempts: 3 });
    assert_eq!(runtime.status_polls.get(), 3);
}

#[tokio::test]
async fn test_terminated_app_stops_polling() {
    let cp = control_plane();
    let runtime = FakeRuntime::with_statuses(&["Pending", "Terminated", "InService"]);

    let err = sessions_for(
        &cp,
        &runtime,
        &user_request(),
        &poll(10),
        &retry(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err, PollError::AppTerminated);
    assert_eq!(runtime.status_polls.get(), 2);
}

#[tokio::test]
async fn test_missing_url_never_touches_the_runtime() {
    let cp = FakeControlPlane::default();
    let err = sessions_for(
        &cp,
        &RuntimeUnreachable,
        &user_request(),
        &poll(3),
        &retry(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err, PollError::MissingUrl);
}

#[tokio::test]
async fn test_url_without_host_is_rejected() {
    let cp = FakeControlPlane {
        presigned_url: Some("not a url".to_string()),
        ..FakeControlPlane::default()
    };
    let err = sessions_for(
        &cp,
        &RuntimeUnreachable,
        &user_request(),
        &poll(3),
        &retry(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err, PollError::BadUrl);
}

#[tokio::test]
async fn test_space_request_is_forwarded() {
    let cp = control_plane();
    let runtime = FakeRuntime {
        xsrf_after_login: true,
        ..FakeRuntime::default()
    };
    let request =
        presign_request(&owner(OwnerKind::SharedSpace, "team"), Some("alice"), &[]).unwrap();

    sessions_for(&cp, &runtime, &request, &poll(3), &retry(), &RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(*cp.presign_requests.borrow(), [request]);
}

#[tokio::test]
async fn test_sessions_are_grouped_by_instance_then_app() {
    let cp = control_plane();
    let runtime = FakeRuntime {
        xsrf_after_login: true,
        sessions: vec![
            raw_session("s1", ResourceType::Notebook, Some("ml.t3.medium"), Some("kg-1")),
            raw_session("s2", ResourceType::Console, Some("ml.t3.medium"), Some("kg-1")),
            raw_session("s3", ResourceType::Notebook, Some("ml.m5.large"), Some("kg-2")),
            raw_session("s4", ResourceType::Notebook, None, None),
        ],
        terminals: vec![Terminal {
            name: "1".to_string(),
            last_activity: None,
        }],
        ..FakeRuntime::default()
    };

    let report = sessions_for(
        &cp,
        &runtime,
        &user_request(),
        &poll(3),
        &retry(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.terminals.len(), 1);
    let kg1 = &report.by_instance["ml.t3.medium"]["kg-1"];
    let ids: Vec<&str> = kg1.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["s1", "s2"]);
    assert_eq!(kg1[0].resource_path, "work/s1.ipynb");
    assert_eq!(report.by_instance[UNKNOWN_KEY][UNKNOWN_KEY].len(), 1);

    let metrics = kernel_metrics(&report.by_instance);
    assert_eq!(metrics.instances, 3);
    assert_eq!(metrics.apps, 3);
    assert_eq!(metrics.notebooks, 3);
    assert_eq!(metrics.others, 1);
}
