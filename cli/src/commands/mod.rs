//! Command implementations

pub mod apps;
pub mod cache;
pub mod config;
pub mod domains;
pub mod sessions;
pub mod terminate;
pub mod version;

use anyhow::Result;
use studio_common::{
    App, Domain, DomainRef, Inventory, SharedSpace, UserProfile, validate_region,
};

use crate::app::AppContext;
use crate::application::ports::ControlPlane;
use crate::application::services::cached::{
    APPS_OP, DOMAINS_OP, SPACES_OP, USER_PROFILES_OP, cache_key, read_through,
};
use crate::application::services::{app_inventory, resource_inventory};
use crate::output::progress;

/// Regions named on the command line, or the configured ones.
///
/// # Errors
///
/// Returns an error if a region identifier is malformed.
pub fn resolve_regions(app: &AppContext, requested: &[String]) -> Result<Vec<String>> {
    let regions = if requested.is_empty() {
        app.config.regions.clone()
    } else {
        requested.to_vec()
    };
    for region in &regions {
        validate_region(region)?;
    }
    Ok(regions)
}

/// Domains of `regions`, through the result cache.
pub async fn load_domains(
    app: &AppContext,
    cp: &impl ControlPlane,
    regions: &[String],
) -> Inventory<Domain> {
    let policy = app.config.retry_policy();
    let pb = progress::maybe_spinner(app.show_progress(), "Listing domains...");
    let inv = read_through(&app.cache, &cache_key(DOMAINS_OP, &regions), || {
        resource_inventory::list_domains(cp, regions, &policy)
    })
    .await;
    progress::finish_clear(&pb);
    inv
}

/// User profiles of `domains`, through the result cache.
pub async fn load_user_profiles(
    app: &AppContext,
    cp: &impl ControlPlane,
    domains: &[DomainRef],
) -> Inventory<UserProfile> {
    let policy = app.config.retry_policy();
    let pb = progress::maybe_spinner(app.show_progress(), "Listing user profiles...");
    let inv = read_through(&app.cache, &cache_key(USER_PROFILES_OP, &domains), || {
        resource_inventory::list_user_profiles(cp, domains, &policy)
    })
    .await;
    progress::finish_clear(&pb);
    inv
}

/// Shared spaces of `domains`, through the result cache.
pub async fn load_spaces(
    app: &AppContext,
    cp: &impl ControlPlane,
    domains: &[DomainRef],
) -> Inventory<SharedSpace> {
    let policy = app.config.retry_policy();
    let pb = progress::maybe_spinner(app.show_progress(), "Listing shared spaces...");
    let inv = read_through(&app.cache, &cache_key(SPACES_OP, &domains), || {
        resource_inventory::list_spaces(cp, domains, &policy)
    })
    .await;
    progress::finish_clear(&pb);
    inv
}

/// Apps of one region, through the result cache.
pub async fn load_apps(
    app: &AppContext,
    cp: &impl ControlPlane,
    region: &str,
    include_default: bool,
) -> Inventory<App> {
    let policy = app.config.retry_policy();
    let pb = progress::maybe_spinner(app.show_progress(), &format!("Listing apps in {region}..."));
    let inv = read_through(
        &app.cache,
        &cache_key(APPS_OP, &(region, include_default)),
        || app_inventory::list_apps(cp, region, include_default, &policy),
    )
    .await;
    progress::finish_clear(&pb);
    inv
}
