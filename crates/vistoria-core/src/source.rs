//! Collaborator contracts
//!
//! The dashboard never talks to storage directly. Records and organizations
//! come from sources behind these traits; fetches finish before aggregation
//! starts.

use crate::error::SourceError;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use vistoria_model::{
    FilterSpec, Fingerprint, Organization, OrganizationId, OrganizationSelector, Record,
};

/// Change token of a record source
///
/// Two equal versions promise the same data behind every coarse filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordVersion(pub u64);

impl RecordVersion {
    /// Memoization key part standing in for the record content
    #[must_use]
    pub fn fingerprint(self) -> Fingerprint {
        let mut tagged = *b"record-version\0\0\0\0\0\0\0\0";
        tagged[14..].copy_from_slice(&self.0.to_le_bytes());
        Fingerprint::compute(&tagged)
    }
}

/// The part of a filter a source may apply server-side
///
/// Sources are free to ignore it; the pipeline re-applies the precise filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoarseFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub organization: Option<OrganizationId>,
}

impl CoarseFilter {
    /// Derive from a dashboard filter
    #[must_use]
    pub fn from_filter(filter: &FilterSpec) -> Self {
        Self {
            since: filter.start,
            until: filter.end,
            organization: match filter.organization {
                OrganizationSelector::All => None,
                OrganizationSelector::Only(id) => Some(id),
            },
        }
    }

    /// Whether a record survives the coarse narrowing
    #[must_use]
    pub fn admits(&self, record: &Record) -> bool {
        let date = record.requested_at.date_naive();
        self.since.map_or(true, |since| date >= since)
            && self.until.map_or(true, |until| date <= until)
            && self
                .organization
                .map_or(true, |id| record.organization_id == Some(id))
    }
}

/// Supplies request records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch all records, optionally narrowed by `coarse`
    async fn fetch(&self, coarse: &CoarseFilter) -> Result<Vec<Record>, SourceError>;

    /// Current change token, `None` when the source cannot tell
    ///
    /// Without a version every refresh fetches and fingerprints the records.
    async fn version(&self) -> Result<Option<RecordVersion>, SourceError> {
        Ok(None)
    }
}

/// Supplies the organization reference set
#[async_trait]
pub trait OrganizationSource: Send + Sync {
    /// Fetch every organization
    async fn fetch_all(&self) -> Result<Vec<Organization>, SourceError>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn fetch(&self, coarse: &CoarseFilter) -> Result<Vec<Record>, SourceError> {
        (**self).fetch(coarse).await
    }

    async fn version(&self) -> Result<Option<RecordVersion>, SourceError> {
        (**self).version().await
    }
}

#[async_trait]
impl<T: OrganizationSource + ?Sized> OrganizationSource for Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<Organization>, SourceError> {
        (**self).fetch_all().await
    }
}

/// Record source over a replaceable in-memory set
#[derive(Debug, Default)]
pub struct InMemoryRecordSource {
    records: RwLock<Vec<Record>>,
    version: AtomicU64,
    fetches: AtomicUsize,
}

impl InMemoryRecordSource {
    /// Create over an initial set
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            version: AtomicU64::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Swap the whole set, as after an upstream write
    pub fn replace(&self, records: Vec<Record>) {
        let mut guard = self.records.write();
        *guard = records;
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of fetches served
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn fetch(&self, coarse: &CoarseFilter) -> Result<Vec<Record>, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| coarse.admits(r))
            .cloned()
            .collect())
    }

    async fn version(&self) -> Result<Option<RecordVersion>, SourceError> {
        Ok(Some(RecordVersion(self.version.load(Ordering::Acquire))))
    }
}

/// Organization source over a replaceable in-memory set
#[derive(Debug, Default)]
pub struct InMemoryOrganizationSource {
    organizations: RwLock<Vec<Organization>>,
    fetches: AtomicUsize,
}

impl InMemoryOrganizationSource {
    /// Create over an initial set
    #[must_use]
    pub fn new(organizations: Vec<Organization>) -> Self {
        Self {
            organizations: RwLock::new(organizations),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Swap the whole set
    pub fn replace(&self, organizations: Vec<Organization>) {
        *self.organizations.write() = organizations;
    }

    /// Number of fetches served
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl OrganizationSource for InMemoryOrganizationSource {
    async fn fetch_all(&self) -> Result<Vec<Organization>, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.organizations.read().clone())
    }
}
