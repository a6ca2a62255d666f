//! Registry test utilities

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};

use deltaver::version::error::RegistryError;
use deltaver::version::registry::Registry;
use deltaver::version::types::{ReleaseHistory, UploadRecord};

/// In-memory registry for testing
pub struct MockRegistry {
    releases: HashMap<String, ReleaseHistory>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            releases: HashMap::new(),
        }
    }

    pub fn with_releases(mut self, package: &str, releases: &[(&str, &[&str])]) -> Self {
        self.releases
            .insert(package.to_string(), create_history(releases));
        self
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_releases(&self, package_name: &str) -> Result<ReleaseHistory, RegistryError> {
        match self.releases.get(package_name) {
            Some(history) => Ok(history.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}

/// Build a release history from (version, upload times) pairs
pub fn create_history(releases: &[(&str, &[&str])]) -> ReleaseHistory {
    releases
        .iter()
        .map(|(version, times)| {
            let uploads = times
                .iter()
                .map(|t| UploadRecord::new(t.parse().unwrap()))
                .collect();
            (*version, uploads)
        })
        .collect()
}

/// Build a PyPI JSON API body from (version, upload times) pairs
pub fn create_pypi_body(releases: &[(&str, &[&str])]) -> String {
    let releases: serde_json::Map<String, Value> = releases
        .iter()
        .map(|(version, times)| {
            let files: Vec<Value> = times
                .iter()
                .map(|t| json!({ "upload_time": t, "packagetype": "bdist_wheel" }))
                .collect();
            (version.to_string(), Value::Array(files))
        })
        .collect();

    json!({ "info": { "name": "pkg" }, "releases": releases }).to_string()
}
