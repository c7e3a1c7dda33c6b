//! Dashboard configuration

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vistoria_analytics::{Aggregator, MonthLabels, DEFAULT_TOP_N};

/// Dashboard service configuration
///
/// Every field has a default, so a partial TOML/JSON document is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Organizations ranked before the rest fold into Others
    pub top_n: usize,
    /// Month label language for the time series
    pub month_labels: MonthLabels,
    /// How long the organization reference set stays fresh
    pub organization_ttl_secs: u64,
    /// Maximum memoized aggregation results
    pub result_cache_capacity: u64,
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With ranking size
    #[inline]
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// With month label language
    #[inline]
    #[must_use]
    pub fn with_month_labels(mut self, labels: MonthLabels) -> Self {
        self.month_labels = labels;
        self
    }

    /// With organization freshness window
    #[inline]
    #[must_use]
    pub fn with_organization_ttl(mut self, ttl: Duration) -> Self {
        self.organization_ttl_secs = ttl.as_secs();
        self
    }

    /// With result cache capacity
    #[inline]
    #[must_use]
    pub fn with_result_cache_capacity(mut self, capacity: u64) -> Self {
        self.result_cache_capacity = capacity;
        self
    }

    /// Organization freshness window
    #[inline]
    #[must_use]
    pub fn organization_ttl(&self) -> Duration {
        Duration::from_secs(self.organization_ttl_secs)
    }

    /// Aggregation options derived from this configuration
    #[inline]
    #[must_use]
    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new()
            .with_top_n(self.top_n)
            .with_month_labels(self.month_labels)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns [`DashboardError::Config`] for a zero ranking size, TTL or
    /// cache capacity
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.top_n == 0 {
            return Err(DashboardError::Config("top_n must be at least 1".into()));
        }
        if self.organization_ttl_secs == 0 {
            return Err(DashboardError::Config(
                "organization_ttl_secs must be at least 1".into(),
            ));
        }
        if self.result_cache_capacity == 0 {
            return Err(DashboardError::Config(
                "result_cache_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            month_labels: MonthLabels::English,
            organization_ttl_secs: 3600,
            result_cache_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DashboardConfig::new();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.organization_ttl(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregator(), Aggregator::new());
    }

    #[test]
    fn zero_values_are_rejected() {
        assert!(DashboardConfig::new().with_top_n(0).validate().is_err());
        assert!(DashboardConfig::new()
            .with_result_cache_capacity(0)
            .validate()
            .is_err());
        assert!(DashboardConfig::new()
            .with_organization_ttl(Duration::from_millis(10))
            .validate()
            .is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            top_n = 5
            month_labels = "portuguese"
            "#,
        )
        .unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.month_labels, MonthLabels::Portuguese);
        assert_eq!(config.result_cache_capacity, 64);
    }
}
