//! Notebook runtime session shapes, endpoint derivation and grouping.
//!
//! Pure functions only. The HTTP calls live behind the `NotebookRuntime` port.

use serde::Deserialize;
use studio_common::{KernelMetrics, ResourceType, Session, SessionsByInstance};

/// Cookie the runtime sets once the Jupyter server has been initialised.
pub const XSRF_COOKIE: &str = "_xsrf";

/// Grouping key used when the runtime omits an instance type or app name.
pub const UNKNOWN_KEY: &str = "unknown";

/// Body values of the `/app` status endpoint that end polling.
pub const STATUS_IN_SERVICE: &str = "InService";
pub const STATUS_TERMINATED: &str = "Terminated";

// ── Wire shapes (Jupyter `/api/sessions`) ────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RawSession {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub kernel: RawKernel,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawKernel {
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub execution_state: String,
    #[serde(default)]
    pub last_activity: Option<String>,
}

// ── Endpoint ─────────────────────────────────────────────────────────────────

/// URLs of one runtime, derived from a presigned login URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEndpoint {
    /// `https://<domain>.studio.<region>.sagemaker.aws`
    pub base_url: String,
    /// `{base_url}/jupyter/default`
    pub api_base_url: String,
}

impl RuntimeEndpoint {
    /// Strips the query and the last path segment from the authorized URL.
    ///
    /// Returns `None` when what remains is not an absolute URL with a host.
    #[must_use]
    pub fn from_authorized_url(url: &str) -> Option<Self> {
        let without_query = url.split_once('?').map_or(url, |(head, _)| head);
        let (base, _) = without_query.rsplit_once('/')?;
        let (_, host) = base.split_once("://")?;
        if host.is_empty() {
            return None;
        }
        Some(Self {
            base_url: base.to_string(),
            api_base_url: format!("{base}/jupyter/default"),
        })
    }

    #[must_use]
    pub fn status_url(&self) -> String {
        format!("{}/app?appType=JupyterServer&appName=default", self.base_url)
    }

    #[must_use]
    pub fn sessions_url(&self) -> String {
        format!("{}/api/sessions", self.api_base_url)
    }

    #[must_use]
    pub fn terminals_url(&self) -> String {
        format!("{}/api/terminals", self.api_base_url)
    }
}

// ── Readiness ────────────────────────────────────────────────────────────────

/// Where the default Jupyter server app is in its start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppReadiness {
    Unknown,
    /// Any non-terminal status, e.g. `Pending`.
    Polling(String),
    InService,
    Terminated,
}

impl AppReadiness {
    /// Interprets the plain-text body of the status endpoint.
    #[must_use]
    pub fn from_status_body(body: &str) -> Self {
        match body.trim() {
            STATUS_IN_SERVICE => Self::InService,
            STATUS_TERMINATED => Self::Terminated,
            "" => Self::Unknown,
            other => Self::Polling(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InService | Self::Terminated)
    }
}

// ── Grouping ─────────────────────────────────────────────────────────────────

/// Groups sessions by kernel instance type, then by app name. Sessions keep
/// their input order within a group.
#[must_use]
pub fn group_sessions(raw: Vec<RawSession>) -> SessionsByInstance {
    let mut grouped = SessionsByInstance::new();
    for s in raw {
        let instance = s
            .kernel
            .instance_type
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        let app = s
            .kernel
            .app_name
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        grouped
            .entry(instance)
            .or_default()
            .entry(app)
            .or_default()
            .push(Session {
                id: s.id,
                resource_name: s.name,
                resource_type: s.resource_type,
                execution_status: s.kernel.execution_state,
                last_activity: s.kernel.last_activity,
                resource_path: s.path,
            });
    }
    grouped
}

/// Counts instances, apps, notebook sessions and every other session kind.
///
/// Terminals listed by `/api/terminals` are not part of `grouped` and are
/// reported separately by the caller.
#[must_use]
pub fn kernel_metrics(grouped: &SessionsByInstance) -> KernelMetrics {
    let mut metrics = KernelMetrics {
        instances: grouped.len(),
        ..KernelMetrics::default()
    };
    for apps in grouped.values() {
        metrics.apps += apps.len();
        for sessions in apps.values() {
            let notebooks = sessions
                .iter()
                .filter(|s| s.resource_type == ResourceType::Notebook)
                .count();
            metrics.notebooks += notebooks;
            metrics.others += sessions.len() - notebooks;
        }
    }
    metrics
}
