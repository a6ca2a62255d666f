use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum DeltaError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Version {version} is newer than the latest known release {latest}")]
    TargetExceedsLatest { version: String, latest: String },

    #[error("No upload time found for the release following {0}")]
    VersionNotFound(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}
