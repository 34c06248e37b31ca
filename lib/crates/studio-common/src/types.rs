use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of parent launched an app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OwnerKind {
    User,
    SharedSpace,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::SharedSpace => f.write_str("SharedSpace"),
        }
    }
}

/// A Studio domain as listed in one region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub region: String,
    pub domain_id: String,
    pub domain_name: String,
    pub status: String,
    pub domain_arn: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_modified_time: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// The `(region, domain id)` pair that scopes profile and space listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct DomainRef {
    pub region: String,
    pub domain_id: String,
}

impl From<&Domain> for DomainRef {
    fn from(d: &Domain) -> Self {
        Self {
            region: d.region.clone(),
            domain_id: d.domain_id.clone(),
        }
    }
}

/// A user profile, enriched from its describe call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub region: String,
    pub domain_id: String,
    pub user_profile_name: String,
    pub user_profile_arn: String,
    pub status: String,
    pub execution_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_id: Option<String>,
    /// True when the profile's user settings attach security groups.
    pub in_vpc: bool,
}

/// A shared space, enriched from its describe call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedSpace {
    pub region: String,
    pub domain_id: String,
    pub space_name: String,
    pub space_arn: String,
    pub status: String,
}

/// A running (or failed) app with its owner classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub region: String,
    pub domain_id: String,
    pub owner_type: OwnerKind,
    pub owner: String,
    pub app_type: String,
    pub app_name: String,
    pub status: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_user_activity: Option<DateTime<Utc>>,
    pub instance_type: Option<String>,
    pub image_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_config_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl App {
    /// The delete/describe target addressing this app.
    #[must_use]
    pub fn target(&self) -> AppTarget {
        AppTarget {
            region: self.region.clone(),
            domain_id: self.domain_id.clone(),
            owner: OwnerRef {
                kind: self.owner_type,
                name: self.owner.clone(),
            },
            app_type: self.app_type.clone(),
            app_name: self.app_name.clone(),
        }
    }
}

/// A profile or space an operator can inspect sessions for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub region: String,
    pub domain_id: String,
    pub owner_type: OwnerKind,
    pub owner: String,
}

/// Owner identity within a domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub name: String,
}

/// Fully-qualified address of one app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct AppTarget {
    pub region: String,
    pub domain_id: String,
    pub owner: OwnerRef,
    pub app_type: String,
    pub app_name: String,
}

impl fmt::Display for AppTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {} '{}' {} '{}'",
            self.region,
            self.domain_id,
            self.owner.kind,
            self.owner.name,
            self.app_type,
            self.app_name
        )
    }
}

// ── Sessions ─────────────────────────────────────────────────────────────────

/// Classification of a live runtime session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Notebook,
    Terminal,
    Console,
    #[serde(other)]
    Other,
}

/// One live kernel session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub resource_name: String,
    pub resource_type: ResourceType,
    pub execution_status: String,
    pub last_activity: Option<String>,
    pub resource_path: String,
}

/// One open terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub name: String,
    /// Jupyter sends `last_activity`.
    #[serde(default, alias = "last_activity")]
    pub last_activity: Option<String>,
}

/// Sessions keyed by instance type, then app name.
pub type SessionsByInstance = BTreeMap<String, BTreeMap<String, Vec<Session>>>;

/// Everything the session poller returns for one owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub by_instance: SessionsByInstance,
    pub terminals: Vec<Terminal>,
}

// ── Metrics ──────────────────────────────────────────────────────────────────

/// Counters shown above the domain inventory.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    pub regions: usize,
    pub domains: usize,
    pub user_profiles: usize,
    pub shared_spaces: usize,
}

/// Counters shown above the app list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppMetrics {
    pub domains: usize,
    pub apps: usize,
    pub user_apps: usize,
    pub shared_space_apps: usize,
    /// Distinct owners per instance type.
    pub owners_by_instance: BTreeMap<String, Vec<String>>,
}

impl AppMetrics {
    /// Sum of distinct owners across instance types.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.owners_by_instance.values().map(Vec::len).sum()
    }
}

/// Counters for one owner's live sessions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KernelMetrics {
    pub instances: usize,
    pub apps: usize,
    pub notebooks: usize,
    pub others: usize,
}

// ── Aggregation results ──────────────────────────────────────────────────────

/// A region, domain or app whose calls failed during aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScopeFailure {
    /// e.g. `region us-east-1` or `domain us-east-1/d-abc`.
    pub scope: String,
    pub error: String,
}

/// Records gathered across scopes, plus the scopes that failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Inventory<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ScopeFailure>,
}

impl<T> Default for Inventory<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Inventory<T> {
    /// True when no scope failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Appends another inventory's items and failures.
    pub fn merge(&mut self, other: Inventory<T>) {
        self.items.extend(other.items);
        self.failures.extend(other.failures);
    }
}

/// How a single delete request ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum TerminateStatus {
    Deleted,
    /// The app was already gone.
    NotFound,
    PermissionDenied(String),
    Failed(String),
}

/// Result of one delete within a bulk terminate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TerminateOutcome {
    pub target: AppTarget,
    pub result: TerminateStatus,
}

// ── Command reports ──────────────────────────────────────────────────────────

/// Output of the `domains` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub metrics: InventoryMetrics,
    pub domains: Vec<Domain>,
    /// Only filled when one or more domains were selected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_profiles: Vec<UserProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_spaces: Vec<SharedSpace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ScopeFailure>,
}

/// Output of the `apps list` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppReport {
    pub region: String,
    pub metrics: AppMetrics,
    pub apps: Vec<App>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ScopeFailure>,
}

/// Output of the `sessions` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionsOutput {
    pub owner: Owner,
    pub metrics: KernelMetrics,
    pub sessions: SessionReport,
}
