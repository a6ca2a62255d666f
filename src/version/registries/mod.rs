//! Registry implementations for fetching release histories

pub mod pypi;

pub use pypi::PypiRegistry;
