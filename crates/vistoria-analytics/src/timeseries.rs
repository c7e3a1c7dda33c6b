//! Monthly time series
//!
//! Buckets the filtered set by calendar month. Each bucket is keyed by the
//! full year and month number, so ordering never depends on the display
//! label and stays chronological across century boundaries.

use chrono::{DateTime, Datelike, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use vistoria_model::Record;

const ENGLISH: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const PORTUGUESE: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Month abbreviations used for bucket labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLabels {
    #[default]
    English,
    Portuguese,
}

impl MonthLabels {
    /// Abbreviation for a 1-based month number
    #[must_use]
    pub fn abbreviation(self, month: u32) -> &'static str {
        let table = match self {
            Self::English => &ENGLISH,
            Self::Portuguese => &PORTUGUESE,
        };
        let idx = month.clamp(1, 12) as usize - 1;
        table[idx]
    }
}

/// Calendar month bucket key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl MonthKey {
    /// Bucket of a timestamp, in UTC
    #[inline]
    #[must_use]
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Display label, e.g. `Jan/25`
    #[must_use]
    pub fn label(self, labels: MonthLabels) -> String {
        format!(
            "{}/{:02}",
            labels.abbreviation(self.month),
            self.year.rem_euclid(100)
        )
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One month of the series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Display label; not a sort key
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    /// Requests received in the month
    pub received: usize,
    /// Requests received in the month that are now completed
    pub completed: usize,
}

impl MonthlyPoint {
    /// Bucket key of this point
    #[inline]
    #[must_use]
    pub fn key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month_number,
        }
    }
}

/// Build the series with English labels
#[must_use]
pub fn build(records: &[&Record]) -> Vec<MonthlyPoint> {
    build_with(records, MonthLabels::default())
}

/// Build the series, sorted ascending by calendar month
#[must_use]
pub fn build_with(records: &[&Record], labels: MonthLabels) -> Vec<MonthlyPoint> {
    let mut buckets: IndexMap<MonthKey, (usize, usize)> = IndexMap::new();

    for record in records {
        let (received, completed) = buckets
            .entry(MonthKey::of(&record.requested_at))
            .or_default();
        *received += 1;
        if record.status.is_completed() {
            *completed += 1;
        }
    }

    buckets.sort_keys();

    buckets
        .into_iter()
        .map(|(key, (received, completed))| MonthlyPoint {
            month: key.label(labels),
            year: key.year,
            month_number: key.month,
            received,
            completed,
        })
        .collect()
}
