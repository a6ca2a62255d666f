//! Day-count staleness of a pinned version
//!
//! [`VersionDelta`] is the single operation every computation in this crate
//! implements. [`ReleaseDelta`] is the computation against a catalog; the
//! policies in [`crate::version::policy`] wrap it.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pep508_rs::pep440_rs::Version;
use tracing::debug;

use crate::version::error::DeltaError;
use crate::version::source::CatalogSource;

/// A number of days a pinned version lags behind, or a typed failure
#[async_trait]
pub trait VersionDelta: Send + Sync {
    async fn days(&self) -> Result<i64, DeltaError>;
}

#[async_trait]
impl<D: VersionDelta + ?Sized> VersionDelta for Box<D> {
    async fn days(&self) -> Result<i64, DeltaError> {
        (**self).days().await
    }
}

/// Current date in UTC
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Days since the release that followed the pinned version became available
pub struct ReleaseDelta<S> {
    source: S,
    version: String,
    today: NaiveDate,
}

impl<S: CatalogSource> ReleaseDelta<S> {
    pub fn new(source: S, version: &str) -> Self {
        Self {
            source,
            version: version.to_string(),
            today: utc_today(),
        }
    }

    /// Count days up to `today` instead of the current date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

#[async_trait]
impl<S: CatalogSource> VersionDelta for ReleaseDelta<S> {
    async fn days(&self) -> Result<i64, DeltaError> {
        let pinned = Version::from_str(&self.version)
            .map_err(|e| DeltaError::InvalidVersion(format!("{}: {}", self.version, e)))?;

        let catalog = self.source.catalog().await?;
        let Some(latest) = catalog.latest() else {
            return Ok(0);
        };

        if pinned > latest.version {
            return Err(DeltaError::TargetExceedsLatest {
                version: self.version.clone(),
                latest: latest.raw.clone(),
            });
        }
        if pinned == latest.version {
            return Ok(0);
        }

        // The successor comes from the filtered catalog, its upload time from
        // the unfiltered history.
        let next = catalog.next_after(&pinned);
        let Some(released) = next.and_then(|r| catalog.history().first_upload(&r.raw)) else {
            return Err(DeltaError::VersionNotFound(self.version.clone()));
        };

        let days = (self.today - released.date_naive()).num_days().max(0);
        debug!(
            "{} superseded by {} on {}: {} days",
            self.version,
            next.map(|r| r.raw.as_str()).unwrap_or_default(),
            released.date_naive(),
            days
        );
        Ok(days)
    }
}
