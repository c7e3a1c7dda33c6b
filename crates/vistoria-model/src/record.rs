//! Inspection request records

use crate::organization::OrganizationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identifier of a request record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create from any string-like value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Workflow status of a request
///
/// Only the three named states get their own counters; anything else the
/// intake process produces is kept verbatim in [`Status::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl Status {
    pub const PENDING: &'static str = "pending";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const COMPLETED: &'static str = "completed";

    /// Parse by exact string equality
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            Self::PENDING => Self::Pending,
            Self::IN_PROGRESS => Self::InProgress,
            Self::COMPLETED => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => Self::PENDING,
            Self::InProgress => Self::IN_PROGRESS,
            Self::Completed => Self::COMPLETED,
            Self::Other(s) => s,
        }
    }

    /// Whether the request reached its final state
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        match value {
            Status::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// One inspection request ("solicitação")
///
/// Immutable once constructed; the aggregation pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    /// `None` when the intake process did not attach an organization
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    pub requested_at: DateTime<Utc>,
    pub status: Status,
}

impl Record {
    /// Create a record
    #[must_use]
    pub fn new(
        id: impl Into<RecordId>,
        organization_id: Option<OrganizationId>,
        requested_at: DateTime<Utc>,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id,
            requested_at,
            status,
        }
    }
}

/// Errors raised when an upstream record row cannot be typed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Required field absent or blank
    #[error("record row missing field `{0}`")]
    MissingField(&'static str),

    /// Timestamp in an unknown format
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),

    /// Organization reference is not an integer
    #[error("invalid organization id `{0}`")]
    InvalidOrganizationId(String),
}
