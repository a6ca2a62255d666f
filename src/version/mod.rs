//! Staleness engine: from a registry's release history to a day count
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Catalog   │────▶│ReleaseDelta │────▶│  Policies   │
//! │  (fetch)    │     │(filter,sort)│     │ (raw days)  │     │  (adjust)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲
//!                     ┌─────────────┐
//!                     │ AsOfCatalog │
//!                     │  (replay)   │
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for fetching release histories
//! - [`registries`]: Concrete registry implementations (PyPI JSON API)
//! - [`types`]: Raw release history and upload records
//! - [`catalog`]: Filtered, ordered catalog of releases
//! - [`source`]: Catalog sources, including the as-of replay filter
//! - [`delta`]: The `VersionDelta` trait and the raw day-count computation
//! - [`policy`]: Overtaking-safe and time-decay wrappers
//! - [`error`]: Error types for registry and delta operations

pub mod catalog;
pub mod delta;
pub mod error;
pub mod policy;
pub mod registries;
pub mod registry;
pub mod source;
pub mod types;
