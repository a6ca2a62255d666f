//! Policies layered on top of a [`VersionDelta`]
//!
//! Each policy wraps another delta and adjusts its result:
//!
//! - [`OvertakingSafeDelta`]: a pinned version ahead of the registry counts as current
//! - [`DecayedDelta`]: a delta fixed at a reference date, shifted to today
//! - [`FixedDelta`]: a delta that is already known
//!
//! Replaying the registry as of a past date is a catalog concern, see
//! [`crate::version::source::AsOfCatalog`].

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::version::delta::{VersionDelta, utc_today};
use crate::version::error::DeltaError;

/// Turns [`DeltaError::TargetExceedsLatest`] into a delta of 0
///
/// For packages installed from a source that publishes ahead of the
/// registry being queried.
pub struct OvertakingSafeDelta<D> {
    origin: D,
}

impl<D: VersionDelta> OvertakingSafeDelta<D> {
    pub fn new(origin: D) -> Self {
        Self { origin }
    }
}

#[async_trait]
impl<D: VersionDelta> VersionDelta for OvertakingSafeDelta<D> {
    async fn days(&self) -> Result<i64, DeltaError> {
        match self.origin.days().await {
            Err(DeltaError::TargetExceedsLatest { version, latest }) => {
                debug!("{} is ahead of latest {}, treating as current", version, latest);
                Ok(0)
            }
            other => other,
        }
    }
}

/// Shifts a delta computed as of `reference` to today
///
/// The days elapsed since `reference` are subtracted from the wrapped
/// delta; the result never goes below 0.
pub struct DecayedDelta<D> {
    origin: D,
    reference: NaiveDate,
    today: NaiveDate,
}

impl<D: VersionDelta> DecayedDelta<D> {
    pub fn new(origin: D, reference: NaiveDate) -> Self {
        Self {
            origin,
            reference,
            today: utc_today(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

#[async_trait]
impl<D: VersionDelta> VersionDelta for DecayedDelta<D> {
    async fn days(&self) -> Result<i64, DeltaError> {
        let elapsed = (self.today - self.reference).num_days();
        Ok((self.origin.days().await? - elapsed).max(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelta(pub i64);

#[async_trait]
impl VersionDelta for FixedDelta {
    async fn days(&self) -> Result<i64, DeltaError> {
        Ok(self.0)
    }
}
