//! Client configuration.
//!
//! Configuration is always an explicit value handed to
//! [`AgentsClient::new`](crate::client::AgentsClient::new) — nothing in the
//! crate consults the environment after construction, which keeps every
//! component testable against a fake service.

use crate::error::{AgentryError, Result};

/// Default service API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2025-05-15-preview";

const ENDPOINT_VARS: [&str; 2] = ["AGENTRY_ENDPOINT", "PROJECT_ENDPOINT"];
const CREDENTIAL_VARS: [&str; 2] = ["AGENTRY_API_KEY", "PROJECT_API_KEY"];

/// Connection settings for a hosted agent service.
#[derive(Debug, Clone)]
pub struct AgentryConfig {
    endpoint: String,
    credential: String,
    api_version: String,
}

impl AgentryConfig {
    /// Create a config from an endpoint URL and a bearer credential.
    pub fn new(endpoint: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: credential.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Override the service API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Load from environment variables, reading `.env` if present.
    ///
    /// Endpoint: `AGENTRY_ENDPOINT`, falling back to `PROJECT_ENDPOINT`.
    /// Credential: `AGENTRY_API_KEY`, falling back to `PROJECT_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let endpoint = first_env(&ENDPOINT_VARS).ok_or_else(|| {
            AgentryError::Configuration("AGENTRY_ENDPOINT (or PROJECT_ENDPOINT) is not set".into())
        })?;
        let credential = first_env(&CREDENTIAL_VARS).ok_or_else(|| {
            AgentryError::Configuration("AGENTRY_API_KEY (or PROJECT_API_KEY) is not set".into())
        })?;

        let mut config = Self::new(endpoint, credential);
        if let Ok(version) = std::env::var("AGENTRY_API_VERSION") {
            config = config.with_api_version(version);
        }
        Ok(config)
    }

    /// Endpoint URL, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Bearer credential presented to the service.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Service API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}
