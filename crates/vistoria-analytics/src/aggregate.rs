//! Aggregation orchestrator
//!
//! Filters once and runs every builder over that single snapshot. The whole
//! pass is synchronous, allocates fresh output and never fails.

use crate::breakdown::{self, CategoryShare};
use crate::index::OrganizationIndex;
use crate::predicate::filter_records;
use crate::ranking::{self, OrganizationRanking, DEFAULT_TOP_N};
use crate::stats::{self, StatusCounts};
use crate::timeseries::{self, MonthLabels, MonthlyPoint};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use vistoria_model::{FilterSpec, Organization, Record};

/// Every dashboard view derived from one filtered pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Size of the filtered set
    pub filtered_count: usize,
    pub stats: StatusCounts,
    pub time_series: Vec<MonthlyPoint>,
    pub ranking: OrganizationRanking,
    pub breakdown: Vec<CategoryShare>,
}

impl AggregationResult {
    /// Whether no record passed the filter
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }
}

/// Aggregation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregator {
    /// Organizations ranked before folding into Others
    pub top_n: usize,
    pub month_labels: MonthLabels,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            month_labels: MonthLabels::default(),
        }
    }
}

impl Aggregator {
    /// Default options: top ten, English month labels
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With ranking size, at least one
    #[inline]
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    /// With month label language
    #[inline]
    #[must_use]
    pub fn with_month_labels(mut self, labels: MonthLabels) -> Self {
        self.month_labels = labels;
        self
    }

    /// Derive every dashboard view for `filter`
    #[must_use]
    pub fn aggregate(
        &self,
        records: &[Record],
        filter: &FilterSpec,
        organizations: &[Organization],
    ) -> AggregationResult {
        let started = Instant::now();
        let index = OrganizationIndex::new(organizations);
        let filtered = filter_records(records, filter);

        let result = AggregationResult {
            filtered_count: filtered.len(),
            stats: stats::reduce(&filtered),
            time_series: timeseries::build_with(&filtered, self.month_labels),
            ranking: ranking::build_top(&filtered, &index, self.top_n),
            breakdown: breakdown::build(&filtered, &index, &filter.category),
        };

        tracing::debug!(
            records = records.len(),
            organizations = index.len(),
            filtered = result.filtered_count,
            months = result.time_series.len(),
            elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "aggregated dashboard"
        );

        result
    }
}

/// Aggregate with default options
#[must_use]
pub fn aggregate(
    records: &[Record],
    filter: &FilterSpec,
    organizations: &[Organization],
) -> AggregationResult {
    Aggregator::default().aggregate(records, filter, organizations)
}
