//! Application service: live kernel sessions for one user profile or space.
//!
//! Obtains a presigned login URL, waits for the default Jupyter server to
//! report `InService`, then reads `/api/terminals` and `/api/sessions`.

use studio_common::{Owner, OwnerKind, SessionReport, UserProfile};

use crate::application::ports::{ControlPlane, NotebookRuntime, ProgressReporter};
use crate::application::services::retry::with_retry;
use crate::domain::catalog::default_user_for_space;
use crate::domain::sessions::{XSRF_COOKIE, group_sessions};
use crate::domain::{
    AppReadiness, PollError, PollPolicy, PresignRequest, RetryPolicy, RuntimeEndpoint,
};

/// Builds the presigned-URL request for `owner`.
///
/// Spaces need a user profile to sign in with: `as_user` when given,
/// otherwise the first profile of the space's region and domain.
///
/// # Errors
///
/// Returns [`PollError::NoUserForSpace`] when a space has no usable profile.
pub fn presign_request(
    owner: &Owner,
    as_user: Option<&str>,
    profiles: &[UserProfile],
) -> Result<PresignRequest, PollError> {
    match owner.owner_type {
        OwnerKind::User => Ok(PresignRequest {
            region: owner.region.clone(),
            domain_id: owner.domain_id.clone(),
            user_profile_name: owner.owner.clone(),
            space_name: None,
        }),
        OwnerKind::SharedSpace => {
            let user = match as_user {
                Some(u) => u.to_string(),
                None => default_user_for_space(profiles, &owner.region, &owner.domain_id)
                    .map(|p| p.user_profile_name.clone())
                    .ok_or_else(|| PollError::NoUserForSpace {
                        domain_id: owner.domain_id.clone(),
                        space: owner.owner.clone(),
                    })?,
            };
            Ok(PresignRequest {
                region: owner.region.clone(),
                domain_id: owner.domain_id.clone(),
                user_profile_name: user,
                space_name: Some(owner.owner.clone()),
            })
        }
    }
}

/// Fetch grouped kernel sessions and open terminals for one owner.
///
/// When the login response already set the `_xsrf` cookie the runtime is
/// taken to be initialised and the readiness poll is skipped.
///
/// # Errors
///
/// Returns a [`PollError`] if the URL cannot be issued, the runtime never
/// becomes ready within `poll`, or a runtime request fails.
pub async fn sessions_for(
    cp: &impl ControlPlane,
    runtime: &impl NotebookRuntime,
    request: &PresignRequest,
    poll: &PollPolicy,
    retry: &RetryPolicy,
    reporter: &impl ProgressReporter,
) -> Result<SessionReport, PollError> {
    let url = with_retry(retry, "CreatePresignedDomainUrl", || {
        cp.create_presigned_url(request)
    })
    .await?
    .ok_or(PollError::MissingUrl)?;
    let endpoint = RuntimeEndpoint::from_authorized_url(&url).ok_or(PollError::BadUrl)?;

    runtime.login(&url).await.map_err(runtime_error)?;

    if runtime.has_cookie(&endpoint, XSRF_COOKIE) {
        tracing::debug!(base = %endpoint.base_url, "runtime already initialised, not polling");
    } else {
        reporter.step("Waiting for the Jupyter server to start...");
        wait_until_ready(runtime, &endpoint, poll).await?;
        runtime
            .get_text(&endpoint.api_base_url)
            .await
            .map_err(runtime_error)?;
    }

    let terminals = runtime
        .list_terminals(&endpoint)
        .await
        .map_err(runtime_error)?;
    let sessions = runtime
        .list_sessions(&endpoint)
        .await
        .map_err(runtime_error)?;

    Ok(SessionReport {
        by_instance: group_sessions(sessions),
        terminals,
    })
}

/// Poll the app status endpoint every `policy.interval` until it reports
/// `InService`, at most `policy.max_attempts` times. Failed status requests
/// use up an attempt without ending the wait.
///
/// # Errors
///
/// [`PollError::AppTerminated`] if the app reports `Terminated`,
/// [`PollError::Timeout`] once the attempts are used up.
pub async fn wait_until_ready(
    runtime: &impl NotebookRuntime,
    endpoint: &RuntimeEndpoint,
    policy: &PollPolicy,
) -> Result<(), PollError> {
    let status_url = endpoint.status_url();
    let mut state = AppReadiness::Unknown;

    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;
        // A gateway error while the server boots counts as one more attempt.
        state = match runtime.get_text(&status_url).await {
            Ok(body) => AppReadiness::from_status_body(&body),
            Err(e) => {
                tracing::debug!(attempt, error = %format!("{e:#}"), "app status unavailable");
                AppReadiness::Unknown
            }
        };
        tracing::debug!(attempt, ?state, "app status");

        match state {
            AppReadiness::InService => return Ok(()),
            AppReadiness::Terminated => return Err(PollError::AppTerminated),
            AppReadiness::Unknown | AppReadiness::Polling(_) => {}
        }
    }

    tracing::warn!(?state, attempts = policy.max_attempts, "app never became ready");
    Err(PollError::Timeout {
        attempts: policy.max_attempts,
    })
}

fn runtime_error(e: anyhow::Error) -> PollError {
    PollError::Runtime(format!("{e:#}"))
}
