//! Raw release data as returned by the registry

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

/// A single uploaded distribution file of a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadRecord {
    /// Upload time, `YYYY-MM-DDTHH:MM:SS`, always UTC
    pub upload_time: NaiveDateTime,
}

impl UploadRecord {
    pub fn new(upload_time: NaiveDateTime) -> Self {
        Self { upload_time }
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.upload_time.and_utc()
    }
}

/// Unfiltered release map of a package: version string -> upload records
///
/// Keeps the order of the registry payload, so ties in upload time
/// resolve the same way on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReleaseHistory(IndexMap<String, Vec<UploadRecord>>);

impl ReleaseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: impl Into<String>, uploads: Vec<UploadRecord>) {
        self.0.insert(version.into(), uploads);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<UploadRecord>)> {
        self.0.iter()
    }

    pub fn uploads(&self, version: &str) -> Option<&[UploadRecord]> {
        self.0.get(version).map(Vec::as_slice)
    }

    /// Earliest upload time of a release, `None` for unknown or metadata-less releases
    pub fn first_upload(&self, version: &str) -> Option<DateTime<Utc>> {
        self.uploads(version).and_then(first_upload)
    }

    /// Keep only the releases for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &[UploadRecord]) -> bool) {
        self.0
            .retain(|version, uploads| keep(version.as_str(), uploads.as_slice()));
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<UploadRecord>)> for ReleaseHistory {
    fn from_iter<T: IntoIterator<Item = (S, Vec<UploadRecord>)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(v, u)| (v.into(), u)).collect())
    }
}

/// Earliest upload time among a set of upload records
pub fn first_upload(uploads: &[UploadRecord]) -> Option<DateTime<Utc>> {
    uploads.iter().map(UploadRecord::uploaded_at).min()
}
