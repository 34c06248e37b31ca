//! `studioctl domains`: domain inventory across regions.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use studio_common::{DomainRef, InventoryReport};

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::commands::{load_domains, load_spaces, load_user_profiles, resolve_regions};
use crate::domain::catalog::inventory_metrics;

/// Arguments for the domains command.
#[derive(Args)]
pub struct DomainsArgs {
    /// Region to scan; repeat for several (default: configured regions)
    #[arg(long = "region", short = 'r', value_name = "REGION")]
    pub regions: Vec<String>,

    /// Also list the user profiles and shared spaces of this domain
    #[arg(long = "domain", short = 'd', value_name = "DOMAIN_ID")]
    pub domains: Vec<String>,
}

/// Run the domains command.
///
/// # Errors
///
/// Returns an error if a region is malformed or output fails.
pub async fn run(app: &AppContext, args: DomainsArgs) -> Result<ExitCode> {
    let regions = resolve_regions(app, &args.regions)?;
    let cp = app.control_plane().await;

    let domains = load_domains(app, &cp, &regions).await;
    let refs: Vec<DomainRef> = domains.items.iter().map(DomainRef::from).collect();
    let profiles = load_user_profiles(app, &cp, &refs).await;
    let spaces = load_spaces(app, &cp, &refs).await;

    let reporter = app.reporter();
    for wanted in &args.domains {
        if !refs.iter().any(|d| &d.domain_id == wanted) {
            reporter.warn(&format!("Domain {wanted} not found"));
        }
    }
    let selected = |domain_id: &str| args.domains.iter().any(|d| d == domain_id);

    let mut failures = domains.failures;
    failures.extend(profiles.failures);
    failures.extend(spaces.failures);

    let report = InventoryReport {
        metrics: inventory_metrics(&domains.items, &profiles.items, &spaces.items),
        user_profiles: profiles
            .items
            .into_iter()
            .filter(|p| selected(&p.domain_id))
            .collect(),
        shared_spaces: spaces
            .items
            .into_iter()
            .filter(|s| selected(&s.domain_id))
            .collect(),
        domains: domains.items,
        failures,
    };
    app.renderer().render_inventory(&report)?;
    Ok(ExitCode::SUCCESS)
}
