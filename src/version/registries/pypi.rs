//! PyPI JSON API client for fetching release histories
//!
//! Works against pypi.org and against artifact repositories that mirror
//! the `/pypi/<name>/json` endpoint (Artifactory, Nexus, devpi).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{FETCH_TIMEOUT_SECS, USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::ReleaseHistory;

/// PyPI registry client
pub struct PypiRegistry {
    client: Client,
    base_url: String,
}

impl PypiRegistry {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build configured HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn package_url(&self, package_name: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package_name)
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    releases: ReleaseHistory,
}

#[async_trait]
impl Registry for PypiRegistry {
    async fn fetch_releases(&self, package_name: &str) -> Result<ReleaseHistory, RegistryError> {
        let url = self.package_url(package_name);
        debug!("Fetching PyPI package: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !response.status().is_success() {
            warn!("PyPI returned status {}: {}", response.status(), url);
            return Err(RegistryError::InvalidResponse(format!(
                "PyPI API returned status {}",
                response.status()
            )));
        }

        let pypi_response: PypiResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse PyPI response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        if pypi_response.releases.is_empty() {
            warn!("PyPI lists no releases for package {}", package_name);
        }
        debug!(
            "Found {} releases for package {}",
            pypi_response.releases.len(),
            package_name
        );

        Ok(pypi_response.releases)
    }
}
