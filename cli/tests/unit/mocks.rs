//! Shared fakes for unit tests.
//!
//! Provides an in-memory [`ControlPlane`] with paged fixtures, a scripted
//! [`NotebookRuntime`] and a recording [`ProgressReporter`] so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use studio_common::{AppTarget, Domain, ResourceType, Terminal};
use studioctl::application::ports::{ControlPlane, NotebookRuntime, ProgressReporter};
use studioctl::domain::{
    AppDetail, AppSummary, ControlPlaneError, Page, PresignRequest, RawSession, RuntimeEndpoint,
    SpaceDetail, SpaceSummary, UserProfileDetail, UserProfileSummary,
};
use studioctl::domain::sessions::RawKernel;

fn unexpected<T>() -> Result<T> {
    anyhow::bail!("not expected in this test")
}

/// Serves `pages[i]` for token `page-{i}` (no token means page 0).
fn serve<T: Clone>(pages: Option<&Vec<Vec<T>>>, token: Option<String>) -> Page<T> {
    let Some(pages) = pages else {
        return Page::last(Vec::new());
    };
    let index: usize = token.map_or(0, |t| {
        t.trim_start_matches("page-")
            .parse()
            .expect("token issued by this fake")
    });
    Page {
        items: pages.get(index).cloned().unwrap_or_default(),
        next_token: (index + 1 < pages.len()).then(|| format!("page-{}", index + 1)),
    }
}

// ── Fixture builders ──────────────────────────────────────────────────────────

pub fn domain(region: &str, domain_id: &str) -> Domain {
    Domain {
        region: String::new(),
        domain_id: domain_id.to_string(),
        domain_name: format!("{domain_id}-name"),
        status: "InService".to_string(),
        domain_arn: format!("arn:aws:sagemaker:{region}:111122223333:domain/{domain_id}"),
        creation_time: None,
        last_modified_time: None,
        url: None,
    }
}

pub fn profile(domain_id: &str, name: &str) -> UserProfileSummary {
    UserProfileSummary {
        domain_id: domain_id.to_string(),
        user_profile_name: name.to_string(),
    }
}

pub fn space(domain_id: &str, name: &str) -> SpaceSummary {
    SpaceSummary {
        domain_id: domain_id.to_string(),
        space_name: name.to_string(),
    }
}

pub fn user_app(domain_id: &str, user: &str, name: &str) -> AppSummary {
    AppSummary {
        domain_id: domain_id.to_string(),
        user_profile_name: Some(user.to_string()),
        space_name: None,
        app_type: "KernelGateway".to_string(),
        app_name: name.to_string(),
        status: "InService".to_string(),
        creation_time: None,
    }
}

pub fn space_app(domain_id: &str, space: &str, name: &str) -> AppSummary {
    AppSummary {
        user_profile_name: None,
        space_name: Some(space.to_string()),
        ..user_app(domain_id, "", name)
    }
}

pub fn raw_session(id: &str, kind: ResourceType, instance: Option<&str>, app: Option<&str>) -> RawSession {
    RawSession {
        id: id.to_string(),
        name: format!("{id}.ipynb"),
        path: format!("work/{id}.ipynb"),
        resource_type: kind,
        kernel: RawKernel {
            instance_type: instance.map(ToString::to_string),
            app_name: app.map(ToString::to_string),
            execution_state: "idle".to_string(),
            last_activity: None,
        },
    }
}

// ── Fake: control plane ───────────────────────────────────────────────────────

/// Control plane backed by in-memory pages.
///
/// Domain pages are keyed by region; profile and space pages by domain id;
/// app pages by region. Errors are keyed by region (list calls) or app name
/// (describe/delete).
#[derive(Default)]
pub struct FakeControlPlane {
    pub domains: HashMap<String, Vec<Vec<Domain>>>,
    pub user_profiles: HashMap<String, Vec<Vec<UserProfileSummary>>>,
    pub spaces: HashMap<String, Vec<Vec<SpaceSummary>>>,
    pub apps: HashMap<String, Vec<Vec<AppSummary>>>,
    pub instance_types: HashMap<String, String>,
    pub failing_regions: HashMap<String, ControlPlaneError>,
    pub failing_domains: HashMap<String, ControlPlaneError>,
    pub describe_app_errors: HashMap<String, ControlPlaneError>,
    pub delete_errors: HashMap<String, ControlPlaneError>,
    /// Number of upcoming `ListDomains` calls that fail with throttling.
    pub throttle_next: Cell<u32>,
    pub presigned_url: Option<String>,
    pub presign_requests: RefCell<Vec<PresignRequest>>,
    pub list_calls: Cell<u32>,
    pub describe_app_calls: Cell<u32>,
    pub deleted: RefCell<Vec<AppTarget>>,
}

impl FakeControlPlane {
    /// Two regions, one domain each, one profile and one space per domain.
    /// Domains are split over two pages in the first region.
    pub fn two_regions() -> Self {
        let mut cp = Self::default();
        cp.domains.insert(
            "us-east-1".to_string(),
            vec![vec![domain("us-east-1", "d-east")], vec![]],
        );
        cp.domains.insert(
            "us-west-2".to_string(),
            vec![vec![domain("us-west-2", "d-west")]],
        );
        for (d, user, sp) in [("d-east", "alice", "team-east"), ("d-west", "bob", "team-west")] {
            cp.user_profiles
                .insert(d.to_string(), vec![vec![profile(d, user)]]);
            cp.spaces.insert(d.to_string(), vec![vec![space(d, sp)]]);
        }
        cp
    }

    fn tick(&self) {
        self.list_calls.set(self.list_calls.get() + 1);
    }

    fn region_check(&self, region: &str) -> Result<(), ControlPlaneError> {
        match self.failing_regions.get(region) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn domain_check(&self, domain_id: &str) -> Result<(), ControlPlaneError> {
        match self.failing_domains.get(domain_id) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl ControlPlane for FakeControlPlane {
    async fn list_domains(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> Result<Page<Domain>, ControlPlaneError> {
        self.tick();
        if self.throttle_next.get() > 0 {
            self.throttle_next.set(self.throttle_next.get() - 1);
            return Err(ControlPlaneError::Throttled("Rate exceeded".to_string()));
        }
        self.region_check(region)?;
        Ok(serve(self.domains.get(region), next_token))
    }

    async fn list_user_profiles(
        &self,
        region: &str,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<UserProfileSummary>, ControlPlaneError> {
        self.tick();
        self.region_check(region)?;
        self.domain_check(domain_id)?;
        Ok(serve(self.user_profiles.get(domain_id), next_token))
    }

    async fn describe_user_profile(
        &self,
        region: &str,
        domain_id: &str,
        user_profile_name: &str,
    ) -> Result<UserProfileDetail, ControlPlaneError> {
        Ok(UserProfileDetail {
            user_profile_arn: format!(
                "arn:aws:sagemaker:{region}:111122223333:user-profile/{domain_id}/{user_profile_name}"
            ),
            status: "InService".to_string(),
            execution_role: Some("arn:aws:iam::111122223333:role/studio".to_string()),
            sso_id: None,
            has_security_groups: false,
        })
    }

    async fn list_spaces(
        &self,
        region: &str,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<SpaceSummary>, ControlPlaneError> {
        self.tick();
        self.region_check(region)?;
        self.domain_check(domain_id)?;
        Ok(serve(self.spaces.get(domain_id), next_token))
    }

    async fn describe_space(
        &self,
        region: &str,
        domain_id: &str,
        space_name: &str,
    ) -> Result<SpaceDetail, ControlPlaneError> {
        Ok(SpaceDetail {
            space_arn: format!("arn:aws:sagemaker:{region}:111122223333:space/{domain_id}/{space_name}"),
            status: "InService".to_string(),
        })
    }

    async fn list_apps(
        &self,
        region: &str,
        next_token: Option<String>,
    ) -> Result<Page<AppSummary>, ControlPlaneError> {
        self.tick();
        self.region_check(region)?;
        Ok(serve(self.apps.get(region), next_token))
    }

    async fn describe_app(&self, target: &AppTarget) -> Result<AppDetail, ControlPlaneError> {
        self.describe_app_calls
            .set(self.describe_app_calls.get() + 1);
        if let Some(e) = self.describe_app_errors.get(&target.app_name) {
            return Err(e.clone());
        }
        Ok(AppDetail {
            instance_type: self.instance_types.get(&target.app_name).cloned(),
            ..AppDetail::default()
        })
    }

    async fn delete_app(&self, target: &AppTarget) -> Result<(), ControlPlaneError> {
        self.deleted.borrow_mut().push(target.clone());
        match self.delete_errors.get(&target.app_name) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn create_presigned_url(
        &self,
        request: &PresignRequest,
    ) -> Result<Option<String>, ControlPlaneError> {
        self.presign_requests.borrow_mut().push(request.clone());
        Ok(self.presigned_url.clone())
    }
}

// ── Fake: notebook runtime ────────────────────────────────────────────────────

/// Runtime that answers status polls from a script.
///
/// Once the script runs out, every further poll sees `Pending`.
#[derive(Default)]
pub struct FakeRuntime {
    pub xsrf_after_login: bool,
    pub statuses: RefCell<VecDeque<String>>,
    /// Status polls that fail before `statuses` is consulted.
    pub failing_polls: Cell<u32>,
    pub sessions: Vec<RawSession>,
    pub terminals: Vec<Terminal>,
    pub logins: RefCell<Vec<String>>,
    pub status_polls: Cell<u32>,
    pub fetched: RefCell<Vec<String>>,
}

impl FakeRuntime {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        Self {
            statuses: RefCell::new(statuses.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }
}

impl NotebookRuntime for FakeRuntime {
    async fn login(&self, authorized_url: &str) -> Result<()> {
        self.logins.borrow_mut().push(authorized_url.to_string());
        Ok(())
    }

    fn has_cookie(&self, _: &RuntimeEndpoint, name: &str) -> bool {
        self.xsrf_after_login && name == "_xsrf"
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.fetched.borrow_mut().push(url.to_string());
        if url.contains("/app?appType=JupyterServer") {
            self.status_polls.set(self.status_polls.get() + 1);
            if self.failing_polls.get() > 0 {
                self.failing_polls.set(self.failing_polls.get() - 1);
                anyhow::bail!("HTTP status server error (502 Bad Gateway)");
            }
            return Ok(self
                .statuses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| "Pending".to_string()));
        }
        Ok(String::new())
    }

    async fn list_sessions(&self, _: &RuntimeEndpoint) -> Result<Vec<RawSession>> {
        Ok(self.sessions.clone())
    }

    async fn list_terminals(&self, _: &RuntimeEndpoint) -> Result<Vec<Terminal>> {
        Ok(self.terminals.clone())
    }
}

/// Runtime whose every call is a test failure.
pub struct RuntimeUnreachable;

impl NotebookRuntime for RuntimeUnreachable {
    async fn login(&self, _: &str) -> Result<()> {
        unexpected()
    }
    fn has_cookie(&self, _: &RuntimeEndpoint, _: &str) -> bool {
        false
    }
    async fn get_text(&self, _: &str) -> Result<String> {
        unexpected()
    }
    async fn list_sessions(&self, _: &RuntimeEndpoint) -> Result<Vec<RawSession>> {
        unexpected()
    }
    async fn list_terminals(&self, _: &RuntimeEndpoint) -> Result<Vec<Terminal>> {
        unexpected()
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Collects every progress message in order.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(format!("ok: {message}"));
    }
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
}
