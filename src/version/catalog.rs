//! Filtered, ordered view of a package's releases
//!
//! A [`Catalog`] is built from the raw [`ReleaseHistory`] of a registry:
//! malformed and pre-release versions are dropped, the rest is sorted by
//! either upload time or version. The unfiltered history is kept alongside,
//! so upload times can be looked up without going through the filter.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pep508_rs::pep440_rs::Version;
use tracing::debug;

use crate::version::types::{ReleaseHistory, UploadRecord, first_upload};

/// Which key decides the order of a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrder {
    /// Earliest upload time of each release. Used for pypi.org.
    #[default]
    UploadTime,
    /// Parsed version. Also drops development releases.
    Version,
}

/// A release that survived filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Version string exactly as the registry spells it
    pub raw: String,
    pub version: Version,
    pub uploads: Vec<UploadRecord>,
}

impl Release {
    /// Earliest upload time, `None` when the release carries no upload records
    pub fn first_upload(&self) -> Option<DateTime<Utc>> {
        first_upload(&self.uploads)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    releases: Vec<Release>,
    history: ReleaseHistory,
}

impl Catalog {
    /// Filter and sort a raw release history
    pub fn build(history: ReleaseHistory, order: CatalogOrder) -> Self {
        let mut releases: Vec<Release> = Vec::with_capacity(history.len());
        let mut positions: HashMap<Version, usize> = HashMap::new();

        for (raw, uploads) in history.iter() {
            let Ok(version) = Version::from_str(raw) else {
                debug!("Skipping malformed version '{}'", raw);
                continue;
            };
            if version.is_pre() {
                continue;
            }
            if order == CatalogOrder::Version && version.is_dev() {
                continue;
            }

            let release = Release {
                raw: raw.clone(),
                version,
                uploads: uploads.clone(),
            };
            match positions.get(&release.version).copied() {
                // Equivalent spellings: by upload time the earliest upload stands for the release
                Some(index)
                    if order == CatalogOrder::UploadTime
                        && uploaded_before(&release, &releases[index]) =>
                {
                    debug!("Replacing '{}' with equivalent '{}'", releases[index].raw, raw);
                    releases[index] = release;
                }
                Some(_) => debug!("Skipping duplicate version '{}'", raw),
                None => {
                    positions.insert(release.version.clone(), releases.len());
                    releases.push(release);
                }
            }
        }

        match order {
            CatalogOrder::UploadTime => releases
                .sort_by_key(|release| release.first_upload().unwrap_or(DateTime::<Utc>::MIN_UTC)),
            CatalogOrder::Version => releases.sort_by(|a, b| a.version.cmp(&b.version)),
        }

        Self { releases, history }
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// The unfiltered history the catalog was built from
    pub fn history(&self) -> &ReleaseHistory {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Last release in catalog order
    pub fn latest(&self) -> Option<&Release> {
        self.releases.last()
    }

    /// Release immediately following `version` in catalog order
    ///
    /// `None` when `version` is not in the catalog or is its last entry.
    pub fn next_after(&self, version: &Version) -> Option<&Release> {
        let position = self.releases.iter().position(|r| &r.version == version)?;
        self.releases.get(position + 1)
    }

    /// Keep only releases accepted by `keep`, in both the filtered and the unfiltered view
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &[UploadRecord]) -> bool) {
        self.releases
            .retain(|r| keep(r.raw.as_str(), r.uploads.as_slice()));
        self.history.retain(keep);
    }
}

/// Whether `a` was uploaded before `b`; a release with uploads precedes one without
fn uploaded_before(a: &Release, b: &Release) -> bool {
    match (a.first_upload(), b.first_upload()) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
