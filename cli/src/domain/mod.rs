//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod catalog;
pub mod config;
pub mod error;
pub mod retry;
pub mod sessions;

pub use catalog::{
    AppDetail, AppSummary, Page, PresignRequest, SpaceDetail, SpaceSummary, UserProfileDetail,
    UserProfileSummary,
};
pub use config::{StudioConfig, validate_config_key, validate_config_value};
pub use error::{CatalogError, ConfigError, ControlPlaneError, PollError, TerminateError};
pub use retry::{PollPolicy, RetryPolicy};
pub use sessions::{AppReadiness, RawSession, RuntimeEndpoint};
