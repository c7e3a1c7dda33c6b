//! Vistoria Model
//!
//! Typed values shared by the dashboard pipeline and its collaborators.
//!
//! # Core Concepts
//!
//! - [`Record`]: one inspection request, with its [`Status`] and organization
//! - [`Organization`]: reference entity carrying the supervising category
//! - [`FilterSpec`]: date range plus organization and category selectors
//! - [`RawRecord`] / [`RawOrganization`]: loosely shaped upstream rows,
//!   typed at the boundary with `TryFrom`
//! - [`Fingerprint`]: Blake3 digest used to key memoized results
//!
//! # Example
//!
//! ```rust,ignore
//! use vistoria_model::{normalize_records, FilterSpec, OrganizationSelector};
//!
//! let batch = normalize_records(rows);
//! let filter = FilterSpec::all().with_organization("2".parse::<OrganizationSelector>()?);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod filter;
mod fingerprint;
mod normalize;
mod organization;
mod record;

// Re-exports
pub use filter::{CategorySelector, FilterError, FilterSpec, OrganizationSelector};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use normalize::{
    normalize_organizations, normalize_records, parse_timestamp, Normalized, RawId,
    RawOrganization, RawRecord, Rejected,
};
pub use organization::{Organization, OrganizationError, OrganizationId};
pub use record::{Record, RecordError, RecordId, Status};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
