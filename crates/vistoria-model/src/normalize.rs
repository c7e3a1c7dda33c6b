//! Collaborator boundary
//!
//! Upstream query results arrive loosely shaped: ids may be numbers or
//! strings, timestamps come in several textual forms and any column may be
//! null. The raw row types here accept all of that, and `TryFrom` turns them
//! into typed [`Record`]s and [`Organization`]s. Rows that cannot be typed
//! are rejected here so the aggregation pipeline never sees them.

use crate::organization::{Organization, OrganizationError, OrganizationId};
use crate::record::{Record, RecordError, RecordId, Status};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// An identifier as upstream serializes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    fn into_text(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }

    fn to_organization_id(&self) -> Option<OrganizationId> {
        match self {
            Self::Int(n) => Some(OrganizationId(*n)),
            Self::Text(s) => s.parse().ok(),
        }
    }
}

/// Untyped record row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "organization_id", alias = "orgId")]
    pub organization_id: Option<RawId>,
    #[serde(default, alias = "requested_at", alias = "createdAt", alias = "created_at")]
    pub requested_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Untyped organization row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrganization {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "short_code", alias = "code")]
    pub short_code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TryFrom<RawRecord> for Record {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .map(RawId::into_text)
            .filter(|s| !s.trim().is_empty())
            .ok_or(RecordError::MissingField("id"))?;

        let organization_id = match raw.organization_id {
            None => None,
            Some(RawId::Text(s)) if s.trim().is_empty() => None,
            Some(other) => Some(
                other
                    .to_organization_id()
                    .ok_or_else(|| RecordError::InvalidOrganizationId(other.into_text()))?,
            ),
        };

        let requested_at = raw
            .requested_at
            .filter(|s| !s.trim().is_empty())
            .ok_or(RecordError::MissingField("requestedAt"))?;
        let requested_at = parse_timestamp(&requested_at)
            .ok_or(RecordError::InvalidTimestamp(requested_at))?;

        let status = raw.status.ok_or(RecordError::MissingField("status"))?;

        Ok(Record {
            id: RecordId::new(id),
            organization_id,
            requested_at,
            status: Status::from(status),
        })
    }
}

impl TryFrom<RawOrganization> for Organization {
    type Error = OrganizationError;

    fn try_from(raw: RawOrganization) -> Result<Self, Self::Error> {
        let raw_id = raw.id.ok_or(OrganizationError::MissingField("id"))?;
        let id = raw_id
            .to_organization_id()
            .ok_or_else(|| OrganizationError::InvalidId(raw_id.into_text()))?;
        let name = raw.name.ok_or(OrganizationError::MissingField("name"))?;
        // A missing code falls back to the display name
        let short_code = raw
            .short_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| name.clone());

        Ok(Organization {
            id,
            name,
            short_code,
            category: raw.category,
        })
    }
}

/// Parse the timestamp forms upstream produces, all read as UTC
///
/// Accepts RFC 3339, a naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]` and a bare
/// `YYYY-MM-DD` date (midnight).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A row that failed to type, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<R, E> {
    /// Position in the input batch
    pub index: usize,
    pub row: R,
    pub error: E,
}

/// Result of typing one batch of rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T, R, E> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Rejected<R, E>>,
}

impl<T, R, E> Normalized<T, R, E> {
    /// Whether every row was accepted
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

fn normalize<T, R, E>(rows: Vec<R>, kind: &'static str) -> Normalized<T, R, E>
where
    R: Clone + TryInto<T, Error = E>,
    E: std::fmt::Display,
{
    let mut accepted = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        match row.clone().try_into() {
            Ok(value) => accepted.push(value),
            Err(error) => {
                tracing::warn!(kind, index, %error, "rejected malformed row");
                rejected.push(Rejected { index, row, error });
            }
        }
    }

    Normalized { accepted, rejected }
}

/// Type a batch of record rows, rejecting the malformed ones
#[must_use]
pub fn normalize_records(rows: Vec<RawRecord>) -> Normalized<Record, RawRecord, RecordError> {
    normalize(rows, "record")
}

/// Type a batch of organization rows, rejecting the malformed ones
#[must_use]
pub fn normalize_organizations(
    rows: Vec<RawOrganization>,
) -> Normalized<Organization, RawOrganization, OrganizationError> {
    normalize(rows, "organization")
}
