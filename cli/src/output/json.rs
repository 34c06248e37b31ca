//! JSON output helpers.
//!
//! `JsonRenderer` prints command results as pretty JSON on stdout, and
//! `format_error` builds the error object every `--json` code path emits when
//! a command fails.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use studio_common::{AppReport, InventoryReport, SessionsOutput, TerminateOutcome};

use crate::domain::{ConfigError, ControlPlaneError, PollError, StudioConfig, TerminateError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable code for the `code` field of a JSON error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<PollError>() {
        e.code()
    } else if let Some(e) = err.downcast_ref::<ControlPlaneError>() {
        e.code()
    } else if err.downcast_ref::<TerminateError>().is_some() {
        "terminate_failed"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "invalid_config"
    } else if err.downcast_ref::<studio_common::RegionError>().is_some() {
        "invalid_region"
    } else {
        "error"
    }
}

/// Renders command results as machine-readable JSON.
pub struct JsonRenderer;

fn print_json(value: &impl Serialize) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_inventory(&self, report: &InventoryReport) -> Result<()> {
        print_json(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_apps(&self, report: &AppReport) -> Result<()> {
        print_json(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_sessions(&self, output: &SessionsOutput) -> Result<()> {
        print_json(output)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_outcomes(&self, outcomes: &[TerminateOutcome]) -> Result<()> {
        print_json(&serde_json::json!({ "outcomes": outcomes }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &StudioConfig, path: &Path) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_cache_cleared(&self, removed: usize) -> Result<()> {
        print_json(&serde_json::json!({ "removed": removed }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print_json(&serde_json::json!({ "version": version }))
    }
}
