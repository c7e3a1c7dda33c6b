//! Filter predicate
//!
//! Decides whether a record belongs to the filtered set. Only the date range
//! and organization selector apply here; the category selector narrows the
//! breakdown output instead.

use vistoria_model::{FilterSpec, Record};

/// Whether `record` passes `filter`
#[inline]
#[must_use]
pub fn matches(record: &Record, filter: &FilterSpec) -> bool {
    filter.admits_date(record.requested_at.date_naive())
        && filter.organization.admits(record.organization_id)
}

/// Borrow the records passing `filter`, preserving input order
#[must_use]
pub fn filter_records<'a>(records: &'a [Record], filter: &FilterSpec) -> Vec<&'a Record> {
    records.iter().filter(|r| matches(r, filter)).collect()
}
