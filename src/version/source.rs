//! Catalog sources: where a delta computation gets its releases from

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::version::catalog::{Catalog, CatalogOrder};
use crate::version::error::DeltaError;
use crate::version::registry::Registry;
use crate::version::types::first_upload;

/// Produces the catalog of one package
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn catalog(&self) -> Result<Catalog, DeltaError>;
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for Box<S> {
    async fn catalog(&self) -> Result<Catalog, DeltaError> {
        (**self).catalog().await
    }
}

/// A catalog that is already at hand
#[async_trait]
impl CatalogSource for Catalog {
    async fn catalog(&self) -> Result<Catalog, DeltaError> {
        Ok(self.clone())
    }
}

/// Fetches the release history of a package from a registry and builds its catalog
pub struct RegistryCatalog {
    registry: Arc<dyn Registry>,
    package_name: String,
    order: CatalogOrder,
}

impl RegistryCatalog {
    pub fn new(registry: Arc<dyn Registry>, package_name: &str, order: CatalogOrder) -> Self {
        Self {
            registry,
            package_name: package_name.to_string(),
            order,
        }
    }
}

#[async_trait]
impl CatalogSource for RegistryCatalog {
    async fn catalog(&self) -> Result<Catalog, DeltaError> {
        let history = self.registry.fetch_releases(&self.package_name).await?;
        let catalog = Catalog::build(history, self.order);
        if catalog.is_empty() {
            debug!("No stable releases of {}", self.package_name);
        }
        Ok(catalog)
    }
}

/// Replays a catalog as it looked before `cutoff`
///
/// Every release first uploaded on or after the cutoff is dropped, and so is
/// every release without upload records, since nothing proves it existed
/// before the cutoff.
pub struct AsOfCatalog<S> {
    origin: S,
    cutoff: NaiveDate,
}

impl<S: CatalogSource> AsOfCatalog<S> {
    pub fn new(origin: S, cutoff: NaiveDate) -> Self {
        Self { origin, cutoff }
    }
}

#[async_trait]
impl<S: CatalogSource> CatalogSource for AsOfCatalog<S> {
    async fn catalog(&self) -> Result<Catalog, DeltaError> {
        let mut catalog = self.origin.catalog().await?;
        let before = catalog.len();

        catalog.retain(|_, uploads| {
            first_upload(uploads).is_some_and(|uploaded| uploaded.date_naive() < self.cutoff)
        });

        debug!(
            "As of {}: kept {} of {} releases",
            self.cutoff,
            catalog.len(),
            before
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::error::RegistryError;
    use crate::version::registry::MockRegistry;
    use crate::version::types::{ReleaseHistory, UploadRecord};

    fn uploads(time: &str) -> Vec<UploadRecord> {
        vec![UploadRecord::new(time.parse().unwrap())]
    }

    fn history() -> ReleaseHistory {
        ReleaseHistory::from_iter([
            ("1.0.0", uploads("2023-01-01T00:00:00")),
            ("1.1.0", uploads("2023-06-01T00:00:00")),
            ("1.2.0", uploads("2023-06-01T23:59:59")),
            ("2.0.0", uploads("2024-01-01T00:00:00")),
            ("0.1.0", vec![]),
        ])
    }

    fn raw_versions(catalog: &Catalog) -> Vec<String> {
        catalog.releases().iter().map(|r| r.raw.clone()).collect()
    }

    #[tokio::test]
    async fn registry_catalog_builds_from_fetched_history() {
        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_releases()
            .withf(|name| name == "requests")
            .times(1)
            .returning(|_| Ok(history()));

        let source = RegistryCatalog::new(Arc::new(registry), "requests", CatalogOrder::Version);
        let catalog = source.catalog().await.unwrap();

        assert_eq!(
            raw_versions(&catalog),
            vec!["0.1.0", "1.0.0", "1.1.0", "1.2.0", "2.0.0"]
        );
    }

    #[tokio::test]
    async fn registry_catalog_propagates_fetch_errors() {
        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_releases()
            .returning(|name| Err(RegistryError::NotFound(name.to_string())));

        let source = RegistryCatalog::new(Arc::new(registry), "missing", CatalogOrder::UploadTime);
        let result = source.catalog().await;

        assert!(matches!(
            result,
            Err(DeltaError::Registry(RegistryError::NotFound(name))) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn as_of_drops_releases_uploaded_on_or_after_cutoff() {
        let origin = Catalog::build(history(), CatalogOrder::UploadTime);
        let cutoff = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();

        let catalog = AsOfCatalog::new(origin, cutoff).catalog().await.unwrap();

        assert_eq!(raw_versions(&catalog), vec!["1.0.0"]);
        assert_eq!(catalog.history().len(), 1);
    }

    #[tokio::test]
    async fn as_of_matches_catalog_built_from_trimmed_payload() {
        let cutoff = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let origin = Catalog::build(history(), CatalogOrder::UploadTime);

        let replayed = AsOfCatalog::new(origin, cutoff).catalog().await.unwrap();
        let trimmed = Catalog::build(
            ReleaseHistory::from_iter([
                ("1.0.0", uploads("2023-01-01T00:00:00")),
                ("1.1.0", uploads("2023-06-01T00:00:00")),
                ("1.2.0", uploads("2023-06-01T23:59:59")),
            ]),
            CatalogOrder::UploadTime,
        );

        assert_eq!(replayed, trimmed);
    }
}
