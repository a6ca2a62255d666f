//! Common types for parsers

use serde::Deserialize;

/// Format of a requirements file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RequirementsFormat {
    /// `pip freeze` output (requirements.txt with `name==version` lines)
    Freezed,
    /// poetry.lock
    Lock,
}

impl RequirementsFormat {
    /// Returns the string representation of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementsFormat::Freezed => "freezed",
            RequirementsFormat::Lock => "lock",
        }
    }

    /// Detect the format from a file path, `None` when the name is not recognized
    pub fn detect(path: &str) -> Option<Self> {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        if file_name == "poetry.lock" {
            Some(RequirementsFormat::Lock)
        } else if file_name.ends_with(".txt") {
            Some(RequirementsFormat::Freezed)
        } else {
            None
        }
    }
}

/// A package pinned to an exact version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedPackage {
    /// Package name as spelled in the file
    pub name: String,
    /// Pinned version
    pub version: String,
    /// Line number (0-indexed)
    pub line: usize,
}

impl PinnedPackage {
    pub fn new(name: &str, version: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            line,
        }
    }
}
