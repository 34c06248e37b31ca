//! App listing: owner classification, default filtering and enrichment.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use studio_common::OwnerKind;
use studioctl::application::services::app_inventory::list_apps;
use studioctl::domain::catalog::app_metrics;
use studioctl::domain::{AppSummary, ControlPlaneError, RetryPolicy};

use crate::mocks::{FakeControlPlane, space_app, user_app};

const REGION: &str = "us-east-1";

fn policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

/// alice runs `datascience` and `default`; space `team` runs `shared-kg`.
fn with_apps() -> FakeControlPlane {
    let mut cp = FakeControlPlane::default();
    cp.apps.insert(
        REGION.to_string(),
        vec![
            vec![
                user_app("d-1", "alice", "datascience"),
                user_app("d-1", "alice", "default"),
            ],
            vec![space_app("d-1", "team", "shared-kg")],
        ],
    );
    cp.instance_types
        .insert("datascience".to_string(), "ml.t3.medium".to_string());
    cp.instance_types
        .insert("shared-kg".to_string(), "ml.m5.large".to_string());
    cp
}

#[tokio::test]
async fn test_apps_are_classified_by_owner() {
    let cp = with_apps();
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert!(apps.is_complete());
    assert_eq!(apps.items.len(), 2);
    assert_eq!(apps.items[0].owner_type, OwnerKind::User);
    assert_eq!(apps.items[0].owner, "alice");
    assert_eq!(apps.items[1].owner_type, OwnerKind::SharedSpace);
    assert_eq!(apps.items[1].owner, "team");
    assert!(apps.items.iter().all(|a| a.region == REGION));
}

#[tokio::test]
async fn test_default_apps_are_dropped_without_describe() {
    let cp = with_apps();
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert!(apps.items.iter().all(|a| a.app_name != "default"));
    assert_eq!(cp.describe_app_calls.get(), 2);
}

#[tokio::test]
async fn test_include_default_keeps_them() {
    let cp = with_apps();
    let apps = list_apps(&cp, REGION, true, &policy()).await;

    assert_eq!(apps.items.len(), 3);
    assert!(apps.items.iter().any(|a| a.app_name == "default"));
    assert_eq!(cp.describe_app_calls.get(), 3);
}

#[tokio::test]
async fn test_describe_fills_instance_type() {
    let cp = with_apps();
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert_eq!(apps.items[0].instance_type.as_deref(), Some("ml.t3.medium"));
    assert_eq!(apps.items[1].instance_type.as_deref(), Some("ml.m5.large"));
}

#[tokio::test]
async fn test_failed_describe_keeps_the_app_unenriched() {
    let mut cp = with_apps();
    cp.describe_app_errors.insert(
        "datascience".to_string(),
        ControlPlaneError::AccessDenied("no DescribeApp".to_string()),
    );
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert_eq!(apps.items.len(), 2);
    assert_eq!(apps.items[0].app_name, "datascience");
    assert!(apps.items[0].instance_type.is_none());
    assert_eq!(apps.failures.len(), 1);
    assert!(apps.failures[0].scope.contains("datascience"));
}

#[tokio::test]
async fn test_app_gone_before_describe_is_dropped_silently() {
    let mut cp = with_apps();
    cp.describe_app_errors.insert(
        "shared-kg".to_string(),
        ControlPlaneError::NotFound("deleted".to_string()),
    );
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert_eq!(apps.items.len(), 1);
    assert!(apps.is_complete());
}

#[tokio::test]
async fn test_app_without_owner_is_reported() {
    let mut cp = with_apps();
    cp.apps.insert(
        REGION.to_string(),
        vec![vec![AppSummary {
            user_profile_name: None,
            ..user_app("d-1", "", "orphan")
        }]],
    );
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert!(apps.items.is_empty());
    assert_eq!(apps.failures.len(), 1);
    assert_eq!(apps.failures[0].scope, "app us-east-1/d-1/orphan");
    assert_eq!(cp.describe_app_calls.get(), 0);
}

#[tokio::test]
async fn test_failed_listing_reports_the_region() {
    let mut cp = with_apps();
    cp.failing_regions.insert(
        REGION.to_string(),
        ControlPlaneError::Other("ListApps broke".to_string()),
    );
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    assert!(apps.items.is_empty());
    assert_eq!(apps.failures[0].scope, "region us-east-1");
}

#[tokio::test]
async fn test_metrics_over_listed_apps() {
    let mut cp = with_apps();
    cp.apps.get_mut(REGION).unwrap()[1].push(user_app("d-2", "bob", "bob-kg"));
    cp.instance_types
        .insert("bob-kg".to_string(), "ml.t3.medium".to_string());
    let apps = list_apps(&cp, REGION, false, &policy()).await;

    let m = app_metrics(&apps.items);
    assert_eq!(m.domains, 2);
    assert_eq!(m.apps, 3);
    assert_eq!(m.user_apps, 2);
    assert_eq!(m.shared_space_apps, 1);
    assert_eq!(m.instance_count(), 3);
    assert_eq!(m.owners_by_instance["ml.t3.medium"], ["alice", "bob"]);
    assert_eq!(m.owners_by_instance["ml.m5.large"], ["team"]);
}
