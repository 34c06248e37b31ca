//! Control-plane record shapes and the pure joins over them.
//!
//! The summary/detail structs mirror what the list and describe calls return;
//! the functions here turn them into the flat records in `studio_common`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use studio_common::{
    App, AppMetrics, Domain, InventoryMetrics, Owner, OwnerKind, OwnerRef, SharedSpace,
    UserProfile,
};

use crate::domain::error::CatalogError;

/// Name of the per-owner system app that `--include-default` keeps.
pub const DEFAULT_APP_NAME: &str = "default";

/// Page size requested from every list call.
pub const PAGE_SIZE: i32 = 100;

/// One page of a paginated list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A page with no continuation.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

// ── Wire shapes ──────────────────────────────────────────────────────────────

/// A row of `ListUserProfiles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileSummary {
    pub domain_id: String,
    pub user_profile_name: String,
}

/// Fields taken from `DescribeUserProfile`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfileDetail {
    pub user_profile_arn: String,
    pub status: String,
    pub execution_role: Option<String>,
    pub sso_id: Option<String>,
    pub has_security_groups: bool,
}

/// A row of `ListSpaces`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceSummary {
    pub domain_id: String,
    pub space_name: String,
}

/// Fields taken from `DescribeSpace`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceDetail {
    pub space_arn: String,
    pub status: String,
}

/// A row of `ListApps`. Exactly one of the owner fields is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSummary {
    pub domain_id: String,
    pub user_profile_name: Option<String>,
    pub space_name: Option<String>,
    pub app_type: String,
    pub app_name: String,
    pub status: String,
    pub creation_time: Option<DateTime<Utc>>,
}

/// Fields taken from `DescribeApp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDetail {
    pub instance_type: Option<String>,
    pub image_arn: Option<String>,
    pub lifecycle_config_arn: Option<String>,
    pub failure_reason: Option<String>,
    pub last_user_activity: Option<DateTime<Utc>>,
}

/// Parameters for `CreatePresignedDomainUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    pub region: String,
    pub domain_id: String,
    pub user_profile_name: String,
    pub space_name: Option<String>,
}

// ── Joins ────────────────────────────────────────────────────────────────────

/// Decides whether an app was launched by a user profile or a space.
///
/// # Errors
///
/// Returns an error when the summary names neither owner or both.
pub fn classify_owner(summary: &AppSummary) -> Result<OwnerRef, CatalogError> {
    match (&summary.user_profile_name, &summary.space_name) {
        (Some(user), None) => Ok(OwnerRef {
            kind: OwnerKind::User,
            name: user.clone(),
        }),
        (None, Some(space)) => Ok(OwnerRef {
            kind: OwnerKind::SharedSpace,
            name: space.clone(),
        }),
        (None, None) => Err(CatalogError::MissingOwner {
            domain_id: summary.domain_id.clone(),
            app_name: summary.app_name.clone(),
        }),
        (Some(_), Some(_)) => Err(CatalogError::AmbiguousOwner {
            domain_id: summary.domain_id.clone(),
            app_name: summary.app_name.clone(),
        }),
    }
}

/// Builds an [`App`] from its list row, owner and (optional) describe result.
#[must_use]
pub fn build_app(
    region: &str,
    summary: AppSummary,
    owner: OwnerRef,
    detail: Option<AppDetail>,
) -> App {
    let detail = detail.unwrap_or_default();
    App {
        region: region.to_string(),
        domain_id: summary.domain_id,
        owner_type: owner.kind,
        owner: owner.name,
        app_type: summary.app_type,
        app_name: summary.app_name,
        status: summary.status,
        creation_time: summary.creation_time,
        last_user_activity: detail.last_user_activity,
        instance_type: detail.instance_type,
        image_arn: detail.image_arn,
        lifecycle_config_arn: detail.lifecycle_config_arn,
        failure_reason: detail.failure_reason,
    }
}

#[must_use]
pub fn build_user_profile(
    region: &str,
    summary: UserProfileSummary,
    detail: UserProfileDetail,
) -> UserProfile {
    UserProfile {
        region: region.to_string(),
        domain_id: summary.domain_id,
        user_profile_name: summary.user_profile_name,
        user_profile_arn: detail.user_profile_arn,
        status: detail.status,
        execution_role: detail.execution_role,
        sso_id: detail.sso_id,
        in_vpc: detail.has_security_groups,
    }
}

#[must_use]
pub fn build_space(region: &str, summary: SpaceSummary, detail: SpaceDetail) -> SharedSpace {
    SharedSpace {
        region: region.to_string(),
        domain_id: summary.domain_id,
        space_name: summary.space_name,
        space_arn: detail.space_arn,
        status: detail.status,
    }
}

/// Drops apps named exactly `default` unless `include_default` is set.
#[must_use]
pub fn filter_default_apps(apps: Vec<App>, include_default: bool) -> Vec<App> {
    if include_default {
        return apps;
    }
    apps.into_iter()
        .filter(|a| a.app_name != DEFAULT_APP_NAME)
        .collect()
}

#[must_use]
pub fn app_metrics(apps: &[App]) -> AppMetrics {
    let domains: BTreeSet<&str> = apps.iter().map(|a| a.domain_id.as_str()).collect();
    let user_apps = apps
        .iter()
        .filter(|a| a.owner_type == OwnerKind::User)
        .count();

    let mut by_instance: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for app in apps {
        if let Some(instance) = &app.instance_type {
            by_instance
                .entry(instance.clone())
                .or_default()
                .insert(app.owner.clone());
        }
    }

    AppMetrics {
        domains: domains.len(),
        apps: apps.len(),
        user_apps,
        shared_space_apps: apps.len() - user_apps,
        owners_by_instance: by_instance
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().collect()))
            .collect(),
    }
}

#[must_use]
pub fn inventory_metrics(
    domains: &[Domain],
    profiles: &[UserProfile],
    spaces: &[SharedSpace],
) -> InventoryMetrics {
    let regions: BTreeSet<&str> = domains.iter().map(|d| d.region.as_str()).collect();
    InventoryMetrics {
        regions: regions.len(),
        domains: domains.len(),
        user_profiles: profiles.len(),
        shared_spaces: spaces.len(),
    }
}

/// Merges profiles and spaces into one owner list, profiles first.
#[must_use]
pub fn list_owners(profiles: &[UserProfile], spaces: &[SharedSpace]) -> Vec<Owner> {
    let users = profiles.iter().map(|p| Owner {
        region: p.region.clone(),
        domain_id: p.domain_id.clone(),
        owner_type: OwnerKind::User,
        owner: p.user_profile_name.clone(),
    });
    let shared = spaces.iter().map(|s| Owner {
        region: s.region.clone(),
        domain_id: s.domain_id.clone(),
        owner_type: OwnerKind::SharedSpace,
        owner: s.space_name.clone(),
    });
    users.chain(shared).collect()
}

/// The profile a space's presigned URL is issued for when the operator does
/// not name one: the first profile listed in the same region and domain.
#[must_use]
pub fn default_user_for_space<'a>(
    profiles: &'a [UserProfile],
    region: &str,
    domain_id: &str,
) -> Option<&'a UserProfile> {
    profiles
        .iter()
        .find(|p| p.region == region && p.domain_id == domain_id)
}
