//! Caches around the aggregation using moka
//!
//! - [`OrganizationCache`]: the organization reference set, kept for a long
//!   freshness window because organizations change rarely
//! - [`ResultCache`]: memoized aggregation results keyed by the
//!   [`Fingerprint`] of their inputs

use crate::error::{DashboardError, SourceError};
use crate::source::OrganizationSource;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use vistoria_analytics::AggregationResult;
use vistoria_model::{Fingerprint, Organization};

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// A fetched organization set with its fingerprint
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationSet {
    pub organizations: Vec<Organization>,
    pub fingerprint: Fingerprint,
}

impl OrganizationSet {
    /// Fingerprint a freshly fetched set
    ///
    /// # Errors
    /// Returns error if the set cannot be serialized
    pub fn new(organizations: Vec<Organization>) -> Result<Self, DashboardError> {
        let fingerprint = Fingerprint::compute_serializable(&organizations)?;
        Ok(Self {
            organizations,
            fingerprint,
        })
    }
}

/// Single-entry cache of the organization reference set
#[derive(Debug, Clone)]
pub struct OrganizationCache {
    inner: Cache<(), Arc<OrganizationSet>>,
}

impl OrganizationCache {
    /// Create cache with a freshness window
    #[inline]
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Cached set, if still fresh
    #[inline]
    pub async fn get(&self) -> Option<Arc<OrganizationSet>> {
        self.inner.get(&()).await
    }

    /// Get the cached set or fetch it from `source`
    ///
    /// Concurrent misses share one fetch.
    ///
    /// # Errors
    /// Returns [`DashboardError::OrganizationSource`] when the fetch fails;
    /// nothing is cached in that case
    pub async fn get_or_fetch<S>(&self, source: &S) -> Result<Arc<OrganizationSet>, DashboardError>
    where
        S: OrganizationSource + ?Sized,
    {
        self.inner
            .try_get_with((), async {
                let fetched = source.fetch_all().await?;
                let set = OrganizationSet::new(fetched)
                    .map_err(|err| SourceError::Malformed(err.to_string()))?;
                tracing::debug!(
                    organizations = set.organizations.len(),
                    fingerprint = %set.fingerprint.short(),
                    "organization cache refilled"
                );
                Ok::<_, SourceError>(Arc::new(set))
            })
            .await
            .map_err(|err: Arc<SourceError>| DashboardError::OrganizationSource((*err).clone()))
    }

    /// Drop the cached set so the next read refetches
    #[inline]
    pub async fn invalidate(&self) {
        self.inner.invalidate(&()).await;
    }
}

/// Memoized aggregation results
#[derive(Debug, Clone)]
pub struct ResultCache {
    inner: Cache<Fingerprint, Arc<AggregationResult>>,
}

impl ResultCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Get memoized result
    #[inline]
    pub async fn get(&self, key: &Fingerprint) -> Option<Arc<AggregationResult>> {
        self.inner.get(key).await
    }

    /// Get or compute result
    ///
    /// The computation is synchronous and runs to completion before the
    /// result is stored.
    pub async fn get_or_compute<F>(&self, key: Fingerprint, compute: F) -> Arc<AggregationResult>
    where
        F: FnOnce() -> AggregationResult,
    {
        self.inner
            .get_with(key, async { Arc::new(compute()) })
            .await
    }

    /// Get the memoized result or load its inputs and compute it
    ///
    /// `load` runs only on a miss, and concurrent misses on one key share
    /// it. A failed load caches nothing.
    ///
    /// # Errors
    /// Returns the error of `load`
    pub async fn try_get_or_load<Fut>(
        &self,
        key: Fingerprint,
        load: Fut,
    ) -> Result<Arc<AggregationResult>, SourceError>
    where
        Fut: Future<Output = Result<AggregationResult, SourceError>>,
    {
        self.inner
            .try_get_with(key, async { load.await.map(Arc::new) })
            .await
            .map_err(|err: Arc<SourceError>| (*err).clone())
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks().await;
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryOrganizationSource;
    use async_trait::async_trait;
    use vistoria_test_utils::scenario_organizations;

    struct Unreachable;

    #[async_trait]
    impl OrganizationSource for Unreachable {
        async fn fetch_all(&self) -> Result<Vec<Organization>, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn organizations_fetched_once_within_ttl() {
        let source = InMemoryOrganizationSource::new(scenario_organizations());
        let cache = OrganizationCache::with_ttl(Duration::from_secs(3600));

        let first = cache.get_or_fetch(&source).await.unwrap();
        let second = cache.get_or_fetch(&source).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(first.organizations.len(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let source = InMemoryOrganizationSource::new(scenario_organizations());
        let cache = OrganizationCache::with_ttl(Duration::from_secs(3600));

        let before = cache.get_or_fetch(&source).await.unwrap();
        source.replace(Vec::new());
        cache.invalidate().await;
        let after = cache.get_or_fetch(&source).await.unwrap();

        assert_eq!(source.fetch_count(), 2);
        assert!(after.organizations.is_empty());
        assert_ne!(before.fingerprint, after.fingerprint);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = OrganizationCache::with_ttl(Duration::from_secs(3600));
        let err = cache.get_or_fetch(&Unreachable).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn results_memoized_by_key() {
        let cache = ResultCache::new(8);
        let key = Fingerprint::compute(b"inputs");
        let mut calls = 0;

        let first = cache
            .get_or_compute(key, || {
                calls += 1;
                AggregationResult::default()
            })
            .await;
        let second = cache
            .get_or_compute(key, || {
                calls += 1;
                AggregationResult::default()
            })
            .await;

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().await.entry_count, 1);

        cache.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let source = InMemoryOrganizationSource::new(scenario_organizations());
        let cache = OrganizationCache::with_ttl(Duration::from_secs(3600));

        let (a, b) = tokio::join!(cache.get_or_fetch(&source), cache.get_or_fetch(&source));

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn load_runs_only_on_miss() {
        let cache = ResultCache::new(8);
        let key = Fingerprint::compute(b"version 0");

        let first = cache
            .try_get_or_load(key, async { Ok::<_, SourceError>(AggregationResult::default()) })
            .await
            .unwrap();
        let second = cache
            .try_get_or_load(key, async {
                Err::<AggregationResult, _>(SourceError::Unavailable("must not be called".into()))
            })
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failed_load_is_not_memoized() {
        let cache = ResultCache::new(8);
        let key = Fingerprint::compute(b"version 1");

        let err = cache
            .try_get_or_load(key, async { Err::<AggregationResult, _>(SourceError::Unavailable("timeout".into())) })
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::Unavailable("timeout".into()));
        assert!(cache.get(&key).await.is_none());
    }
}
