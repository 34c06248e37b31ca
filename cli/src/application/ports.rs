//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;
use studio_common::{AppTarget, Domain, Terminal};

use crate::domain::{
    AppDetail, AppSummary, ControlPlaneError, Page, PresignRequest, RawSession, RuntimeEndpoint,
    SpaceDetail, SpaceSummary, StudioConfig, UserProfileDetail, UserProfileSummary,
};

// ── Control Plane Port ────────────────────────────────────────────────────────

/// SageMaker control-plane calls, one request per method.
///
/// List methods return a single page; draining continuation tokens is the
/// caller's job so that paging can be exercised without the SDK.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    /// `ListDomains` for one region. Returned domains carry `region`.
    async fn list_domains(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> Result<Page<Domain>, ControlPlaneError>;

    /// `ListUserProfiles` filtered to one domain.
    async fn list_user_profiles(
        &self,
        region: &str,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<UserProfileSummary>, ControlPlaneError>;

    /// `DescribeUserProfile`.
    async fn describe_user_profile(
        &self,
        region: &str,
        domain_id: &str,
        user_profile_name: &str,
    ) -> Result<UserProfileDetail, ControlPlaneError>;

    /// `ListSpaces` filtered to one domain.
    async fn list_spaces(
        &self,
        region: &str,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<SpaceSummary>, ControlPlaneError>;

    /// `DescribeSpace`.
    async fn describe_space(
        &self,
        region: &str,
        domain_id: &str,
        space_name: &str,
    ) -> Result<SpaceDetail, ControlPlaneError>;

    /// `ListApps` across every domain of a region.
    async fn list_apps(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> Result<Page<AppSummary>, ControlPlaneError>;

    /// `DescribeApp`, addressed by user profile or space per `target.owner`.
    async fn describe_app(&self, target: &AppTarget) -> Result<AppDetail, ControlPlaneError>;

    /// `DeleteApp`, addressed by user profile or space per `target.owner`.
    async fn delete_app(&self, target: &AppTarget) -> Result<(), ControlPlaneError>;

    /// `CreatePresignedDomainUrl`; `None` when the response has no URL.
    async fn create_presigned_url(
        &self,
        request: &PresignRequest,
    ) -> Result<Option<String>, ControlPlaneError>;
}

// ── Notebook Runtime Port ─────────────────────────────────────────────────────

/// HTTP client for a Studio notebook runtime, holding a cookie session.
///
/// One value corresponds to one browser-like session: cookies set by
/// `login` are sent with every later request.
#[allow(async_fn_in_trait)]
pub trait NotebookRuntime {
    /// GET the presigned URL, accepting the cookies it sets.
    async fn login(&self, authorized_url: &str) -> Result<()>;
    /// Whether the session holds a cookie named `name` for the runtime.
    fn has_cookie(&self, endpoint: &RuntimeEndpoint, name: &str) -> bool;
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String>;
    /// GET `/api/sessions`.
    async fn list_sessions(&self, endpoint: &RuntimeEndpoint) -> Result<Vec<RawSession>>;
    /// GET `/api/terminals`.
    async fn list_terminals(&self, endpoint: &RuntimeEndpoint) -> Result<Vec<Terminal>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Cache Port ────────────────────────────────────────────────────────────────

/// Read-through result cache keyed by serialized call arguments.
///
/// Values are opaque JSON; typing happens in `services::cached`.
pub trait ResultCache {
    /// Look up a key. A missing or unreadable entry is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;
    /// Store a value, replacing any previous entry.
    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()>;
    /// Drop every entry whose key starts with `prefix`; returns how many.
    fn invalidate_prefix(&self, prefix: &str) -> Result<usize>;
    /// Drop every entry; returns how many.
    fn clear(&self) -> Result<usize>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading and saving the YAML configuration file.
pub trait ConfigStore {
    /// Load the config, returning defaults if the file does not exist.
    fn load(&self) -> Result<StudioConfig>;
    /// Persist the config.
    fn save(&self, config: &StudioConfig) -> Result<()>;
    /// Location of the config file.
    fn path(&self) -> Result<PathBuf>;
}
