//! Infrastructure implementation of the `NotebookRuntime` port.
//!
//! A `reqwest` client with its own cookie jar plays the part of the browser
//! that follows a presigned Studio URL.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use studio_common::Terminal;

use crate::application::ports::NotebookRuntime;
use crate::domain::{RawSession, RuntimeEndpoint};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One cookie session against a notebook runtime.
pub struct JupyterClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl JupyterClient {
    /// Build a client with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self { http, jar })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(url = redact(url), "GET");
        self.http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", redact(url)))?
            .error_for_status()
            .with_context(|| format!("GET {}", redact(url)))
    }
}

/// Presigned URLs carry a bearer token in the query; keep it out of logs.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

impl NotebookRuntime for JupyterClient {
    async fn login(&self, authorized_url: &str) -> Result<()> {
        self.get(authorized_url).await?;
        Ok(())
    }

    fn has_cookie(&self, endpoint: &RuntimeEndpoint, name: &str) -> bool {
        // The cookie may be scoped to the Jupyter path rather than the root.
        [&endpoint.base_url, &endpoint.api_base_url]
            .into_iter()
            .filter_map(|u| reqwest::Url::parse(u).ok())
            .filter_map(|url| self.jar.cookies(&url))
            .any(|header| {
                header.to_str().is_ok_and(|cookies| {
                    cookies
                        .split(';')
                        .filter_map(|pair| pair.trim().split_once('='))
                        .any(|(k, _)| k == name)
                })
            })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.get(url)
            .await?
            .text()
            .await
            .with_context(|| format!("reading body of {}", redact(url)))
    }

    async fn list_sessions(&self, endpoint: &RuntimeEndpoint) -> Result<Vec<RawSession>> {
        let url = endpoint.sessions_url();
        self.get(&url)
            .await?
            .json()
            .await
            .with_context(|| format!("parsing {url}"))
    }

    async fn list_terminals(&self, endpoint: &RuntimeEndpoint) -> Result<Vec<Terminal>> {
        let url = endpoint.terminals_url();
        self.get(&url)
            .await?
            .json()
            .await
            .with_context(|| format!("parsing {url}"))
    }
}
