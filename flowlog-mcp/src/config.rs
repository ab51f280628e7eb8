//! Configuration module
//!
//! Holds the settings the host process needs to reach the backend log API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

/// Default base URL of the backend API
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API (e.g., "http://localhost:8080/api/v1")
    pub base_url: String,

    /// Tenant appended to the base URL as one extra path segment
    pub tenant: Option<String>,

    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            tenant: None,
            timeout: None,
        }
    }

    /// Scopes the API to a tenant
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Sets a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if let Some(tenant) = &self.tenant {
            if tenant.contains('/') {
                anyhow::bail!("tenant cannot contain '/'");
            }
            if tenant == "." || tenant == ".." {
                anyhow::bail!("tenant cannot be '.' or '..'");
            }
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }

    /// Base URL the log endpoints are appended to
    ///
    /// The tenant is percent-encoded as one path segment, so characters such
    /// as `?` or `#` stay part of the tenant name.
    pub fn api_url(&self) -> Result<String> {
        let base = self.base_url.trim().trim_end_matches('/');
        let mut url = Url::parse(base).with_context(|| format!("Invalid base_url: {}", base))?;

        if let Some(tenant) = self.tenant.as_deref().filter(|t| !t.is_empty()) {
            url.path_segments_mut()
                .map_err(|_| anyhow::anyhow!("base_url cannot carry a path: {}", base))?
                .pop_if_empty()
                .push(tenant);
        }

        Ok(url.to_string())
    }

    /// Builds the shared HTTP client used for every backend request
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("flowlog-mcp/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().context("Failed to build HTTP client")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}
