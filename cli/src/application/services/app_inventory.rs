//! Application service: app listing with owner classification and detail
//! enrichment.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use studio_common::{App, AppTarget, Inventory, ScopeFailure};

use crate::application::ports::ControlPlane;
use crate::application::services::paging::drain_pages;
use crate::application::services::resource_inventory::scope_failure;
use crate::application::services::retry::with_retry;
use crate::domain::catalog::{DEFAULT_APP_NAME, build_app, classify_owner, filter_default_apps};
use crate::domain::{ControlPlaneError, RetryPolicy};

/// List every app in `region`, across all of its domains.
///
/// Each app is described to pick up its instance type, image, lifecycle
/// configuration and failure reason. A failed describe keeps the app with
/// those fields empty and records the failure; an app that vanished between
/// list and describe is dropped. Apps named `default` are removed unless
/// `include_default` is set, and are not described in that case.
pub async fn list_apps(
    cp: &impl ControlPlane,
    region: &str,
    include_default: bool,
    policy: &RetryPolicy,
) -> Inventory<App> {
    let summaries = match drain_pages(policy, "ListApps", |token| cp.list_apps(region, token)).await
    {
        Ok(s) => s,
        Err(e) => {
            return Inventory {
                items: Vec::new(),
                failures: vec![scope_failure(format!("region {region}"), &e)],
            };
        }
    };
    tracing::debug!(region, count = summaries.len(), "listed apps");

    let mut inventory = Inventory::default();
    for summary in summaries {
        if !include_default && summary.app_name == DEFAULT_APP_NAME {
            continue;
        }

        let owner = match classify_owner(&summary) {
            Ok(owner) => owner,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unclassifiable app");
                inventory.failures.push(ScopeFailure {
                    scope: format!("app {region}/{}/{}", summary.domain_id, summary.app_name),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let target = AppTarget {
            region: region.to_string(),
            domain_id: summary.domain_id.clone(),
            owner: owner.clone(),
            app_type: summary.app_type.clone(),
            app_name: summary.app_name.clone(),
        };
        let detail = match with_retry(policy, "DescribeApp", || cp.describe_app(&target)).await {
            Ok(detail) => Some(detail),
            Err(ControlPlaneError::NotFound(_)) => {
                tracing::debug!(%target, "app disappeared before describe");
                continue;
            }
            Err(e) => {
                inventory
                    .failures
                    .push(scope_failure(format!("app {target}"), &e));
                None
            }
        };

        inventory.items.push(build_app(region, summary, owner, detail));
    }

    inventory.items = filter_default_apps(inventory.items, include_default);
    inventory
}
