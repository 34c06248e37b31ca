//! Application service: deleting apps.
//!
//! Deletes are never retried: a repeated `DeleteApp` on an app that is
//! already shutting down fails rather than helping.

use studio_common::{AppTarget, TerminateOutcome, TerminateStatus};

use crate::application::ports::{ControlPlane, ProgressReporter};
use crate::domain::TerminateError;

/// Delete one app.
///
/// # Errors
///
/// Returns the classified failure; `NotFound` means the app was already gone.
pub async fn terminate(cp: &impl ControlPlane, target: &AppTarget) -> Result<(), TerminateError> {
    tracing::info!(%target, "deleting app");
    cp.delete_app(target).await.map_err(TerminateError::from)
}

/// Delete each target in turn, carrying on past failures.
pub async fn terminate_many(
    cp: &impl ControlPlane,
    targets: &[AppTarget],
    reporter: &impl ProgressReporter,
) -> Vec<TerminateOutcome> {
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        reporter.step(&format!("Deleting {target}"));
        let result = outcome_status(terminate(cp, target).await);
        match &result {
            TerminateStatus::Deleted => reporter.success(&format!("Deleted {target}")),
            TerminateStatus::NotFound => reporter.warn(&format!("Already gone: {target}")),
            TerminateStatus::PermissionDenied(msg) | TerminateStatus::Failed(msg) => {
                reporter.warn(&format!("Could not delete {target}: {msg}"));
            }
        }
        outcomes.push(TerminateOutcome {
            target: target.clone(),
            result,
        });
    }
    outcomes
}

/// Maps a delete result onto the reported status.
#[must_use]
pub fn outcome_status(result: Result<(), TerminateError>) -> TerminateStatus {
    match result {
        Ok(()) => TerminateStatus::Deleted,
        Err(TerminateError::NotFound(_)) => TerminateStatus::NotFound,
        Err(TerminateError::PermissionDenied(msg)) => TerminateStatus::PermissionDenied(msg),
        Err(e) => TerminateStatus::Failed(e.to_string()),
    }
}
