//! Staleness audit of a set of pinned packages
//!
//! Builds the delta chain for every package and runs them one after another.
//! The chain for a package is, from the inside out:
//!
//! 1. [`RegistryCatalog`] fetching the package's releases
//! 2. [`AsOfCatalog`] when an as-of date is configured
//! 3. [`ReleaseDelta`] computing the raw day count
//! 4. [`OvertakingSafeDelta`] when enabled
//! 5. [`DecayedDelta`] back to the as-of date, when configured

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{DEFAULT_PYPI_REGISTRY, DeltaverConfig};
use crate::parser::types::PinnedPackage;
use crate::version::catalog::CatalogOrder;
use crate::version::delta::{ReleaseDelta, VersionDelta, utc_today};
use crate::version::error::DeltaError;
use crate::version::policy::{DecayedDelta, OvertakingSafeDelta};
use crate::version::registries::PypiRegistry;
use crate::version::registry::Registry;
use crate::version::source::{AsOfCatalog, CatalogSource, RegistryCatalog};

#[derive(Debug, Error)]
#[error("{package}=={version} (line {}): {source}", .line + 1)]
pub struct AuditError {
    pub package: String,
    pub version: String,
    /// Line of the pin in the requirements file (0-indexed)
    pub line: usize,
    pub source: DeltaError,
}

/// Staleness of one pinned package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDelta {
    pub name: String,
    pub version: String,
    pub days: i64,
}

pub struct Auditor {
    registry: Arc<dyn Registry>,
    order: CatalogOrder,
    for_date: Option<NaiveDate>,
    overtaking_safe: bool,
    excluded: Vec<String>,
    today: NaiveDate,
}

impl Auditor {
    pub fn new(registry: Arc<dyn Registry>, order: CatalogOrder) -> Self {
        Self {
            registry,
            order,
            for_date: None,
            overtaking_safe: false,
            excluded: Vec::new(),
            today: utc_today(),
        }
    }

    /// Auditor against pypi.org, or against the configured artifact repository
    ///
    /// Artifact repositories do not carry trustworthy upload order, so their
    /// catalogs are ordered by version.
    pub fn from_config(config: &DeltaverConfig) -> Self {
        let (base_url, order) = match &config.artifactory_domain {
            Some(domain) => (domain.as_str(), CatalogOrder::Version),
            None => (DEFAULT_PYPI_REGISTRY, CatalogOrder::UploadTime),
        };
        info!("Using registry {} ({:?} order)", base_url, order);

        let mut auditor = Self::new(Arc::new(PypiRegistry::new(base_url)), order)
            .with_overtaking_safe(config.overtaking_safe)
            .with_excluded(config.excluded.clone());
        if let Some(for_date) = config.for_date {
            auditor = auditor.with_for_date(for_date);
        }
        auditor
    }

    pub fn with_for_date(mut self, for_date: NaiveDate) -> Self {
        self.for_date = Some(for_date);
        self
    }

    pub fn with_overtaking_safe(mut self, enabled: bool) -> Self {
        self.overtaking_safe = enabled;
        self
    }

    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Delta chain for one package
    pub fn delta_for(&self, package: &PinnedPackage) -> Box<dyn VersionDelta> {
        let mut source: Box<dyn CatalogSource> = Box::new(RegistryCatalog::new(
            self.registry.clone(),
            &package.name,
            self.order,
        ));
        if let Some(for_date) = self.for_date {
            source = Box::new(AsOfCatalog::new(source, for_date));
        }

        let mut delta: Box<dyn VersionDelta> =
            Box::new(ReleaseDelta::new(source, &package.version).with_today(self.today));
        if self.overtaking_safe {
            delta = Box::new(OvertakingSafeDelta::new(delta));
        }
        if let Some(for_date) = self.for_date {
            delta = Box::new(DecayedDelta::new(delta, for_date).with_today(self.today));
        }
        delta
    }

    /// Compute the delta of every package not excluded, in order
    ///
    /// Stops at the first package whose delta cannot be computed.
    pub async fn audit(&self, packages: &[PinnedPackage]) -> Result<Vec<PackageDelta>, AuditError> {
        let mut results = Vec::with_capacity(packages.len());

        for package in packages {
            if self.is_excluded(&package.name) {
                debug!("Skipping excluded package {}", package.name);
                continue;
            }

            let days = self
                .delta_for(package)
                .days()
                .await
                .map_err(|source| AuditError {
                    package: package.name.clone(),
                    version: package.version.clone(),
                    line: package.line,
                    source,
                })?;
            debug!("{}=={}: {} days", package.name, package.version, days);

            results.push(PackageDelta {
                name: package.name.clone(),
                version: package.version.clone(),
                days,
            });
        }

        info!("Audited {} packages", results.len());
        Ok(results)
    }

    fn is_excluded(&self, package_name: &str) -> bool {
        self.excluded
            .iter()
            .any(|name| normalize_name(name) == normalize_name(package_name))
    }
}

/// PEP 503 name normalization: case-insensitive, `-`, `_` and `.` are equivalent
fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase().replace(['_', '.'], "-")
}
