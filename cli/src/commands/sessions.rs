//! `studioctl sessions`: live kernel sessions of one user profile or space.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use studio_common::{DomainRef, Owner, OwnerKind, SessionsOutput, validate_region};

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::session_poller::{presign_request, sessions_for};
use crate::commands::load_user_profiles;
use crate::commands::terminate::OwnerArgs;
use crate::domain::sessions::kernel_metrics;
use crate::infra::jupyter::JupyterClient;

/// Arguments for the sessions command.
#[derive(Args)]
pub struct SessionsArgs {
    /// Region of the domain
    #[arg(long, short = 'r')]
    pub region: String,

    /// Domain id
    #[arg(long, short = 'd', value_name = "DOMAIN_ID")]
    pub domain: String,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// User profile to sign in as when inspecting a space
    /// (default: the first profile of the domain)
    #[arg(long, conflicts_with = "user")]
    pub as_user: Option<String>,
}

/// Run the sessions command.
///
/// # Errors
///
/// Returns an error if the presigned URL cannot be issued, the runtime
/// never becomes ready, or a runtime request fails.
pub async fn run(app: &AppContext, args: SessionsArgs) -> Result<ExitCode> {
    validate_region(&args.region)?;
    let owner_ref = args
        .owner
        .owner_ref()
        .ok_or_else(|| anyhow::anyhow!("one of --user or --space is required"))?;
    let owner = Owner {
        region: args.region.clone(),
        domain_id: args.domain.clone(),
        owner_type: owner_ref.kind,
        owner: owner_ref.name,
    };

    let cp = app.control_plane().await;
    let profiles = if owner.owner_type == OwnerKind::SharedSpace && args.as_user.is_none() {
        let domain = DomainRef {
            region: args.region.clone(),
            domain_id: args.domain.clone(),
        };
        load_user_profiles(app, &cp, &[domain]).await.items
    } else {
        Vec::new()
    };
    let request = presign_request(&owner, args.as_user.as_deref(), &profiles)?;

    let runtime = JupyterClient::new()?;
    let reporter = app.reporter();
    reporter.step(&format!(
        "Signing in to {} '{}' as {}",
        owner.owner_type, owner.owner, request.user_profile_name
    ));
    let report = sessions_for(
        &cp,
        &runtime,
        &request,
        &app.config.poll_policy(),
        &app.config.retry_policy(),
        &reporter,
    )
    .await
    .with_context(|| format!("fetching sessions of {}", owner.owner))?;

    let output = SessionsOutput {
        metrics: kernel_metrics(&report.by_instance),
        owner,
        sessions: report,
    };
    app.renderer().render_sessions(&output)?;
    Ok(ExitCode::SUCCESS)
}
