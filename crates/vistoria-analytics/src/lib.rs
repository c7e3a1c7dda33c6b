//! Vistoria Analytics
//!
//! Pure, in-memory aggregation behind the inspection-request dashboard.
//!
//! # Core Concepts
//!
//! - [`matches`]: the filter predicate (date range, organization)
//! - [`stats::reduce`]: status counters
//! - [`timeseries::build`]: received/completed counts per calendar month
//! - [`ranking::build`]: top ten organizations plus an "Others" bucket
//! - [`breakdown::build`]: per-category totals via the organization join
//! - [`aggregate`] / [`Aggregator`]: one filtered pass feeding every builder
//!
//! # Example
//!
//! ```rust,ignore
//! use vistoria_analytics::aggregate;
//! use vistoria_model::FilterSpec;
//!
//! let result = aggregate(&records, &FilterSpec::all(), &organizations);
//! println!("{} requests, {} completed", result.stats.total, result.stats.completed);
//! ```

#![allow(missing_docs)]
#![warn(unreachable_pub)]

pub mod breakdown;
pub mod ranking;
pub mod stats;
pub mod timeseries;

mod aggregate;
mod index;
mod predicate;
mod share;

// Re-exports
pub use aggregate::{aggregate, AggregationResult, Aggregator};
pub use breakdown::CategoryShare;
pub use index::OrganizationIndex;
pub use predicate::{filter_records, matches};
pub use ranking::{OrganizationRanking, RankedEntry, DEFAULT_TOP_N};
pub use share::Share;
pub use stats::StatusCounts;
pub use timeseries::{MonthKey, MonthLabels, MonthlyPoint};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
