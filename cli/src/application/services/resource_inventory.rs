//! Application service: domain, user profile and shared space inventory.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! These functions are infallible: a region or domain whose calls fail is
//! recorded in `Inventory::failures` and the rest of the aggregation carries
//! on.

use studio_common::{Domain, DomainRef, Inventory, ScopeFailure, SharedSpace, UserProfile};

use crate::application::ports::ControlPlane;
use crate::application::services::paging::drain_pages;
use crate::application::services::retry::with_retry;
use crate::domain::catalog::{build_space, build_user_profile};
use crate::domain::{ControlPlaneError, RetryPolicy};

/// List every domain in each region.
pub async fn list_domains(
    cp: &impl ControlPlane,
    regions: &[String],
    policy: &RetryPolicy,
) -> Inventory<Domain> {
    let mut inventory = Inventory::default();
    for region in regions {
        match drain_pages(policy, "ListDomains", |token| cp.list_domains(region, token)).await {
            Ok(domains) => {
                tracing::debug!(region = %region, count = domains.len(), "listed domains");
                inventory
                    .items
                    .extend(domains.into_iter().map(|d| Domain {
                        region: region.clone(),
                        ..d
                    }));
            }
            Err(e) => inventory
                .failures
                .push(scope_failure(format!("region {region}"), &e)),
        }
    }
    inventory
}

/// List and describe every user profile of each domain.
pub async fn list_user_profiles(
    cp: &impl ControlPlane,
    domains: &[DomainRef],
    policy: &RetryPolicy,
) -> Inventory<UserProfile> {
    let mut inventory = Inventory::default();
    for d in domains {
        let listed = drain_pages(policy, "ListUserProfiles", |token| {
            cp.list_user_profiles(&d.region, &d.domain_id, token)
        })
        .await;
        let summaries = match listed {
            Ok(s) => s,
            Err(e) => {
                inventory.failures.push(scope_failure(domain_scope(d), &e));
                continue;
            }
        };

        for summary in summaries {
            let name = summary.user_profile_name.clone();
            let described = with_retry(policy, "DescribeUserProfile", || {
                cp.describe_user_profile(&d.region, &d.domain_id, &name)
            })
            .await;
            match described {
                Ok(detail) => inventory
                    .items
                    .push(build_user_profile(&d.region, summary, detail)),
                Err(e) => inventory.failures.push(scope_failure(
                    format!("user profile {}/{}/{name}", d.region, d.domain_id),
                    &e,
                )),
            }
        }
    }
    inventory
}

/// List and describe every shared space of each domain.
pub async fn list_spaces(
    cp: &impl ControlPlane,
    domains: &[DomainRef],
    policy: &RetryPolicy,
) -> Inventory<SharedSpace> {
    let mut inventory = Inventory::default();
    for d in domains {
        let listed = drain_pages(policy, "ListSpaces", |token| {
            cp.list_spaces(&d.region, &d.domain_id, token)
        })
        .await;
        let summaries = match listed {
            Ok(s) => s,
            Err(e) => {
                inventory.failures.push(scope_failure(domain_scope(d), &e));
                continue;
            }
        };

        for summary in summaries {
            let name = summary.space_name.clone();
            let described = with_retry(policy, "DescribeSpace", || {
                cp.describe_space(&d.region, &d.domain_id, &name)
            })
            .await;
            match described {
                Ok(detail) => inventory.items.push(build_space(&d.region, summary, detail)),
                Err(e) => inventory.failures.push(scope_failure(
                    format!("space {}/{}/{name}", d.region, d.domain_id),
                    &e,
                )),
            }
        }
    }
    inventory
}

fn domain_scope(d: &DomainRef) -> String {
    format!("domain {}/{}", d.region, d.domain_id)
}

pub(crate) fn scope_failure(scope: String, error: &ControlPlaneError) -> ScopeFailure {
    tracing::warn!(scope = %scope, error = %error, "skipping failed scope");
    ScopeFailure {
        scope,
        error: error.to_string(),
    }
}
