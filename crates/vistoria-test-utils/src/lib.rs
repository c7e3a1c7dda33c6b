//! Testing utilities for the Vistoria workspace
//!
//! Shared fixtures and record builders.

#![allow(missing_docs)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use vistoria_model::{Organization, OrganizationId, Record, RecordId, Status};

/// Midnight UTC on the given day
pub fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn org(id: i64, category: &str) -> Organization {
    Organization::new(id, format!("Organization {id}"), format!("ORG{id}")).with_category(category)
}

pub fn record(id: u64, organization: i64, requested_at: DateTime<Utc>, status: &str) -> Record {
    RecordBuilder::new(id)
        .organization(organization)
        .requested_at(requested_at)
        .status(status)
        .build()
}

/// Builder for records with sensible defaults
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    id: RecordId,
    organization_id: Option<OrganizationId>,
    requested_at: DateTime<Utc>,
    status: Status,
}

impl RecordBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id: RecordId::from(id),
            organization_id: None,
            requested_at: ts(2025, 1, 1),
            status: Status::Pending,
        }
    }

    pub fn organization(mut self, id: i64) -> Self {
        self.organization_id = Some(OrganizationId(id));
        self
    }

    pub fn requested_at(mut self, at: DateTime<Utc>) -> Self {
        self.requested_at = at;
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Status::parse(status);
        self
    }

    pub fn build(self) -> Record {
        Record::new(self.id, self.organization_id, self.requested_at, self.status)
    }
}

/// Three requests across two organizations in Jan/Feb 2025
pub fn scenario_records() -> Vec<Record> {
    vec![
        record(1, 1, ts(2025, 1, 5), "completed"),
        record(2, 1, ts(2025, 1, 20), "pending"),
        record(3, 2, ts(2025, 2, 1), "completed"),
    ]
}

pub fn scenario_organizations() -> Vec<Organization> {
    vec![org(1, "Obras"), org(2, "Saúde")]
}

/// `n` organizations, ids `1..=n`, alternating between two categories
pub fn many_organizations(n: i64) -> Vec<Organization> {
    (1..=n)
        .map(|id| org(id, if id % 2 == 0 { "Saúde" } else { "Obras" }))
        .collect()
}

/// `counts[i]` pending records for organization `i + 1`, in January 2025
pub fn records_with_counts(counts: &[usize]) -> Vec<Record> {
    let mut next_id = 0u64;
    let mut records = Vec::new();
    for (i, &count) in counts.iter().enumerate() {
        let organization = i64::try_from(i).unwrap() + 1;
        for _ in 0..count {
            next_id += 1;
            records.push(record(next_id, organization, ts(2025, 1, 10), "pending"));
        }
    }
    records
}
