//! Dashboard service
//!
//! Ties the collaborators, caches and the aggregation pipeline together.
//! Every filter change is a fresh [`Dashboard::refresh`]; nothing cached is
//! ever mutated in place.
//!
//! # Stale results
//! Each refresh takes a [`Generation`]. Refreshes may overlap (fast filter
//! changes in the UI); the caller keeps only the snapshot whose generation
//! is still current and drops the rest. The service does no cancellation.
//!
//! # Memoization
//! A source that reports a [`RecordVersion`](crate::RecordVersion) is keyed
//! by that version: a hit skips the record fetch entirely. Sources without a
//! version are fetched and fingerprinted on every refresh. The version is
//! read before the fetch, so a memoized result may be newer than its key but
//! never older.

use crate::cache::{OrganizationCache, ResultCache};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, SourceError};
use crate::source::{CoarseFilter, OrganizationSource, RecordSource};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use vistoria_analytics::{AggregationResult, Aggregator};
use vistoria_model::{FilterSpec, Fingerprint};

/// Token identifying one refresh
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(pub u64);

/// Issues strictly increasing generations
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    /// Create counter; the first issued generation is 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation
    #[inline]
    pub fn issue(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Most recently issued generation
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }
}

/// Result of one refresh
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generation: Generation,
    /// Memoization key of the inputs
    pub fingerprint: Fingerprint,
    pub result: Arc<AggregationResult>,
}

/// The dashboard view model behind the UI
pub struct Dashboard<R, O> {
    records: R,
    organizations: O,
    config: DashboardConfig,
    aggregator: Aggregator,
    /// Fingerprint of `aggregator`
    options: Fingerprint,
    organization_cache: OrganizationCache,
    results: ResultCache,
    generations: GenerationCounter,
}

impl<R, O> Dashboard<R, O>
where
    R: RecordSource,
    O: OrganizationSource,
{
    /// Create a dashboard over two sources
    ///
    /// # Errors
    /// Returns [`DashboardError::Config`] if `config` is invalid
    pub fn new(records: R, organizations: O, config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let aggregator = config.aggregator();
        Ok(Self {
            records,
            organizations,
            options: Fingerprint::compute_serializable(&aggregator)?,
            aggregator,
            organization_cache: OrganizationCache::with_ttl(config.organization_ttl()),
            results: ResultCache::new(config.result_cache_capacity),
            generations: GenerationCounter::new(),
            config,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Fetch, aggregate and return a snapshot for `filter`
    ///
    /// The aggregation is reused when record version (or content), filter,
    /// organizations and options are unchanged. Records are fetched in full
    /// before an aggregation starts.
    ///
    /// # Errors
    /// - [`DashboardError::InvalidFilter`] before any fetch
    /// - [`DashboardError::RecordSource`] / [`DashboardError::OrganizationSource`]
    ///   when a collaborator fails
    pub async fn refresh(&self, filter: &FilterSpec) -> Result<Snapshot, DashboardError> {
        filter.validate()?;
        let generation = self.generations.issue();

        let coarse = CoarseFilter::from_filter(filter);
        let organizations = self
            .organization_cache
            .get_or_fetch(&self.organizations)
            .await?;
        let filter_key = Fingerprint::compute_serializable(filter)?;
        let key_with = |records_key: Fingerprint| {
            Fingerprint::combine(&[records_key, filter_key, organizations.fingerprint, self.options])
        };

        let version = self
            .records
            .version()
            .await
            .map_err(DashboardError::RecordSource)?;

        let (fingerprint, result) = if let Some(version) = version {
            let fingerprint = key_with(version.fingerprint());
            let result = self
                .results
                .try_get_or_load(fingerprint, async {
                    let records = self.records.fetch(&coarse).await?;
                    Ok::<_, SourceError>(self
                        .aggregator
                        .aggregate(&records, filter, &organizations.organizations))
                })
                .await
                .map_err(DashboardError::RecordSource)?;
            (fingerprint, result)
        } else {
            let records = self
                .records
                .fetch(&coarse)
                .await
                .map_err(DashboardError::RecordSource)?;
            let fingerprint = key_with(Fingerprint::compute_serializable(&records)?);
            let result = self
                .results
                .get_or_compute(fingerprint, || {
                    self.aggregator
                        .aggregate(&records, filter, &organizations.organizations)
                })
                .await;
            (fingerprint, result)
        };

        tracing::debug!(
            generation = generation.0,
            key = %fingerprint.short(),
            versioned = version.is_some(),
            filtered = result.filtered_count,
            "dashboard refreshed"
        );

        Ok(Snapshot {
            generation,
            fingerprint,
            result,
        })
    }

    /// Whether no refresh started after `generation`
    #[inline]
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generations.latest() == generation
    }

    /// Force the next refresh to refetch organizations
    pub async fn invalidate_organizations(&self) {
        self.organization_cache.invalidate().await;
    }

    /// Drop every memoized result
    pub fn clear_results(&self) {
        self.results.invalidate_all();
    }

    /// Memoized result count
    pub async fn cached_results(&self) -> u64 {
        self.results.stats().await.entry_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_increase() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.latest(), Generation(0));
        let a = counter.issue();
        let b = counter.issue();
        assert!(b > a);
        assert_eq!(counter.latest(), b);
    }
}
