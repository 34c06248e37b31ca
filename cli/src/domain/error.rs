//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Control-plane errors ──────────────────────────────────────────────────────

/// A failed SageMaker control-plane call, classified by what the caller can do
/// about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlPlaneError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("request throttled: {0}")]
    Throttled(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Other(String),
}

impl ControlPlaneError {
    /// Throttling and transport failures may succeed on a later attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled(_) | Self::Transient(_))
    }

    /// Stable machine-readable code for `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AccessDenied(_) => "access_denied",
            Self::Throttled(_) => "throttled",
            Self::Transient(_) => "transient",
            Self::Other(_) => "control_plane",
        }
    }
}

/// How far a failed control-plane request got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailure<'a> {
    /// The service answered with an error, possibly without a code.
    Service(Option<&'a str>),
    /// The connection dropped, timed out or returned an unparseable response.
    Transport,
    /// The request was never sent: missing credentials, bad endpoint or
    /// invalid input. Repeating it cannot help.
    Local,
}

/// Maps a failed request onto a [`ControlPlaneError`].
#[must_use]
pub fn classify_failure(failure: RequestFailure<'_>, message: String) -> ControlPlaneError {
    match failure {
        RequestFailure::Service(code) => classify_error_code(code, message),
        RequestFailure::Transport => ControlPlaneError::Transient(message),
        RequestFailure::Local => ControlPlaneError::Other(message),
    }
}

/// Maps an AWS error code onto a [`ControlPlaneError`].
///
/// `None` is a service error without a code, treated as transient.
#[must_use]
pub fn classify_error_code(code: Option<&str>, message: String) -> ControlPlaneError {
    match code {
        None => ControlPlaneError::Transient(message),
        Some("ResourceNotFound" | "ResourceNotFoundException" | "NotFoundException") => {
            ControlPlaneError::NotFound(message)
        }
        Some(
            "AccessDenied"
            | "AccessDeniedException"
            | "UnauthorizedOperation"
            | "UnrecognizedClientException"
            | "ExpiredToken"
            | "ExpiredTokenException",
        ) => ControlPlaneError::AccessDenied(message),
        Some(
            "Throttling"
            | "ThrottlingException"
            | "TooManyRequestsException"
            | "RequestLimitExceeded"
            | "ProvisionedThroughputExceededException",
        ) => ControlPlaneError::Throttled(message),
        Some(
            "ServiceUnavailable"
            | "ServiceUnavailableException"
            | "InternalFailure"
            | "InternalServerError"
            | "RequestTimeout"
            | "RequestTimeoutException",
        ) => ControlPlaneError::Transient(message),
        Some(_) => ControlPlaneError::Other(message),
    }
}

// ── Catalog errors ────────────────────────────────────────────────────────────

/// Records returned by the control plane that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("app '{app_name}' in domain {domain_id} names neither a user profile nor a space")]
    MissingOwner { domain_id: String, app_name: String },

    #[error("app '{app_name}' in domain {domain_id} names both a user profile and a space")]
    AmbiguousOwner { domain_id: String, app_name: String },
}

// ── Session poller errors ─────────────────────────────────────────────────────

/// Why live sessions could not be fetched for an owner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),

    #[error("presigned domain URL response carried no authorized URL")]
    MissingUrl,

    #[error("cannot derive runtime endpoint from authorized URL")]
    BadUrl,

    #[error("notebook runtime request failed: {0}")]
    Runtime(String),

    #[error("app did not report InService after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("app was terminated before it became ready")]
    AppTerminated,

    #[error("no user profile in domain {domain_id} to open space '{space}' with")]
    NoUserForSpace { domain_id: String, space: String },
}

impl PollError {
    /// Stable machine-readable code for `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ControlPlane(e) => e.code(),
            Self::MissingUrl | Self::BadUrl => "bad_presigned_url",
            Self::Runtime(_) => "runtime",
            Self::Timeout { .. } => "poll_timeout",
            Self::AppTerminated => "app_terminated",
            Self::NoUserForSpace { .. } => "no_user_for_space",
        }
    }
}

// ── Terminate errors ──────────────────────────────────────────────────────────

/// Why a `DeleteApp` call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminateError {
    /// The app was already deleted.
    #[error("app not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Other(String),
}

impl From<ControlPlaneError> for TerminateError {
    fn from(e: ControlPlaneError) -> Self {
        match e {
            ControlPlaneError::NotFound(m) => Self::NotFound(m),
            ControlPlaneError::AccessDenied(m) => Self::PermissionDenied(m),
            ControlPlaneError::Throttled(m) | ControlPlaneError::Transient(m) => {
                Self::Transient(m)
            }
            ControlPlaneError::Other(m) => Self::Other(m),
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
