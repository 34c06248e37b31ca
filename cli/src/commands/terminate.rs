//! `studioctl terminate`: delete one app by its full address.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use studio_common::{
    AppTarget, OwnerKind, OwnerRef, TerminateOutcome, TerminateStatus, validate_region,
};

use crate::app::AppContext;
use crate::application::services::app_terminate::{outcome_status, terminate};
use crate::application::services::cached::invalidate_apps;

/// The user profile or space an app belongs to.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct OwnerArgs {
    /// Owning user profile
    #[arg(long)]
    pub user: Option<String>,

    /// Owning shared space
    #[arg(long)]
    pub space: Option<String>,
}

impl OwnerArgs {
    /// The owner named on the command line.
    #[must_use]
    pub fn owner_ref(&self) -> Option<OwnerRef> {
        match (&self.user, &self.space) {
            (Some(user), _) => Some(OwnerRef {
                kind: OwnerKind::User,
                name: user.clone(),
            }),
            (None, Some(space)) => Some(OwnerRef {
                kind: OwnerKind::SharedSpace,
                name: space.clone(),
            }),
            (None, None) => None,
        }
    }
}

/// Arguments for the terminate command.
#[derive(Args)]
pub struct TerminateArgs {
    /// Region of the domain
    #[arg(long, short = 'r')]
    pub region: String,

    /// Domain id
    #[arg(long, short = 'd', value_name = "DOMAIN_ID")]
    pub domain: String,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// App name
    #[arg(long)]
    pub app_name: String,

    /// App type
    #[arg(long, default_value = "KernelGateway")]
    pub app_type: String,
}

/// Run the terminate command.
///
/// # Errors
///
/// Returns an error if the region is malformed, no owner is named, the
/// prompt fails, or output fails.
pub async fn run(app: &AppContext, args: TerminateArgs) -> Result<ExitCode> {
    validate_region(&args.region)?;
    let owner = args
        .owner
        .owner_ref()
        .ok_or_else(|| anyhow::anyhow!("one of --user or --space is required"))?;
    let target = AppTarget {
        region: args.region,
        domain_id: args.domain,
        owner,
        app_type: args.app_type,
        app_name: args.app_name,
    };

    if !app.non_interactive && !app.confirm(&format!("Delete {target}?"), false)? {
        app.output.info("Nothing deleted.");
        return Ok(ExitCode::SUCCESS);
    }

    let cp = app.control_plane().await;
    let result = outcome_status(terminate(&cp, &target).await);
    invalidate_apps(&app.cache, [target.region.as_str()]);

    let ok = matches!(result, TerminateStatus::Deleted | TerminateStatus::NotFound);
    app.renderer()
        .render_outcomes(&[TerminateOutcome { target, result }])?;
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
