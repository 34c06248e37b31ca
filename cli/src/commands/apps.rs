//! `studioctl apps`: list running apps of a region and bulk-terminate them.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use studio_common::{App, AppReport, AppTarget, TerminateStatus, validate_region};

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::app_terminate::terminate_many;
use crate::application::services::cached::invalidate_apps;
use crate::commands::load_apps;
use crate::domain::catalog::app_metrics;
use crate::output::human::app_label;

/// Apps subcommands.
#[derive(Subcommand)]
pub enum AppsCommand {
    /// List apps of a region with summary counters
    List(ListArgs),
    /// Select apps of a region and delete them
    Terminate(TerminateArgs),
}

/// Arguments for `apps list`.
#[derive(Args)]
pub struct ListArgs {
    /// Region to list
    #[arg(long, short = 'r')]
    pub region: String,

    /// Keep the per-owner system apps named `default`
    #[arg(long)]
    pub include_default: bool,
}

/// Arguments for `apps terminate`.
#[derive(Args)]
pub struct TerminateArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Only apps of this domain
    #[arg(long, short = 'd', value_name = "DOMAIN_ID")]
    pub domain: Option<String>,

    /// Only apps of this user profile or space
    #[arg(long)]
    pub owner: Option<String>,

    /// Only apps of this type (e.g. KernelGateway)
    #[arg(long)]
    pub app_type: Option<String>,

    /// Only apps on this instance type (e.g. ml.t3.medium)
    #[arg(long)]
    pub instance_type: Option<String>,
}

impl TerminateArgs {
    fn matches(&self, app: &App) -> bool {
        self.domain.as_ref().is_none_or(|d| &app.domain_id == d)
            && self.owner.as_ref().is_none_or(|o| &app.owner == o)
            && self.app_type.as_ref().is_none_or(|t| &app.app_type == t)
            && self
                .instance_type
                .as_ref()
                .is_none_or(|i| app.instance_type.as_ref() == Some(i))
    }
}

/// Run the apps command.
///
/// # Errors
///
/// Returns an error if the region is malformed, a prompt fails, or output
/// fails.
pub async fn run(app: &AppContext, cmd: AppsCommand) -> Result<ExitCode> {
    match cmd {
        AppsCommand::List(args) => list(app, &args).await,
        AppsCommand::Terminate(args) => terminate(app, &args).await,
    }
}

async fn list(app: &AppContext, args: &ListArgs) -> Result<ExitCode> {
    validate_region(&args.region)?;
    let cp = app.control_plane().await;
    let apps = load_apps(app, &cp, &args.region, args.include_default).await;

    let report = AppReport {
        region: args.region.clone(),
        metrics: app_metrics(&apps.items),
        apps: apps.items,
        failures: apps.failures,
    };
    app.renderer().render_apps(&report)?;
    Ok(ExitCode::SUCCESS)
}

async fn terminate(app: &AppContext, args: &TerminateArgs) -> Result<ExitCode> {
    validate_region(&args.list.region)?;
    let cp = app.control_plane().await;
    let apps = load_apps(app, &cp, &args.list.region, args.list.include_default).await;
    let reporter = app.reporter();
    for f in &apps.failures {
        reporter.warn(&format!("Incomplete: {} ({})", f.scope, f.error));
    }

    let candidates: Vec<&App> = apps.items.iter().filter(|a| args.matches(a)).collect();
    let targets = select_targets(app, &candidates)?;
    if targets.is_empty() {
        app.renderer().render_outcomes(&[])?;
        return Ok(ExitCode::SUCCESS);
    }

    let outcomes = terminate_many(&cp, &targets, &reporter).await;
    invalidate_apps(&app.cache, [args.list.region.as_str()]);
    app.renderer().render_outcomes(&outcomes)?;

    let failed = outcomes.iter().any(|o| {
        matches!(
            o.result,
            TerminateStatus::PermissionDenied(_) | TerminateStatus::Failed(_)
        )
    });
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Every candidate when non-interactive; otherwise a multi-select prompt
/// followed by a confirmation.
fn select_targets(app: &AppContext, candidates: &[&App]) -> Result<Vec<AppTarget>> {
    if candidates.is_empty() || app.non_interactive {
        return Ok(candidates.iter().map(|a| a.target()).collect());
    }

    let labels: Vec<String> = candidates.iter().map(|a| app_label(a)).collect();
    let chosen = dialoguer::MultiSelect::new()
        .with_prompt("Select apps to terminate (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()
        .context("app selection")?;
    if chosen.is_empty() {
        return Ok(Vec::new());
    }
    if !app.confirm(&format!("Delete {} app(s)?", chosen.len()), false)? {
        return Ok(Vec::new());
    }
    Ok(chosen.into_iter().map(|i| candidates[i].target()).collect())
}
