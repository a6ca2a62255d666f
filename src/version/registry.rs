//! Registry trait for fetching release histories from a package index

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::ReleaseHistory;

/// Trait for fetching the full release history of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches every release of a package together with its upload records
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "requests")
    ///
    /// # Returns
    /// * `Ok(ReleaseHistory)` - Releases in the order the registry returned them
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_releases(&self, package_name: &str) -> Result<ReleaseHistory, RegistryError>;
}
