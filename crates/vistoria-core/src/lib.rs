//! Vistoria Core - dashboard service
//!
//! The layer between the UI and the aggregation pipeline:
//! - Fetches records and organizations through collaborator traits
//! - Caches the organization reference set for a long freshness window
//! - Memoizes aggregation results keyed by record version and input fingerprints
//! - Tags every refresh with a generation so stale results can be dropped
//!
//! # Example
//!
//! ```rust,ignore
//! use vistoria_core::{Dashboard, DashboardConfig, InMemoryOrganizationSource, InMemoryRecordSource};
//! use vistoria_model::FilterSpec;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::new(
//!     InMemoryRecordSource::new(records),
//!     InMemoryOrganizationSource::new(organizations),
//!     DashboardConfig::new(),
//! )?;
//!
//! let snapshot = dashboard.refresh(&FilterSpec::all()).await?;
//! if dashboard.is_current(snapshot.generation) {
//!     println!("{} requests", snapshot.result.stats.total);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod source;

// Re-exports for convenience
pub use cache::{CacheStats, OrganizationCache, OrganizationSet, ResultCache};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Generation, GenerationCounter, Snapshot};
pub use error::{DashboardError, SourceError};
pub use source::{
    CoarseFilter, InMemoryOrganizationSource, InMemoryRecordSource, OrganizationSource,
    RecordSource, RecordVersion,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the dashboard service
    pub use crate::{
        Dashboard, DashboardConfig, DashboardError, Generation, OrganizationSource,
        RecordSource, Snapshot,
    };
    pub use vistoria_analytics::AggregationResult;
    pub use vistoria_model::{CategorySelector, FilterSpec, OrganizationSelector};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
