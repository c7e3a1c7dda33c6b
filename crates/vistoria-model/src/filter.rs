//! User-selected dashboard filters

use crate::organization::OrganizationId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

const ALL: &str = "all";

/// Which organization the dashboard is narrowed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrganizationSelector {
    #[default]
    All,
    Only(OrganizationId),
}

impl OrganizationSelector {
    /// Whether a record's organization reference passes the selector
    #[inline]
    #[must_use]
    pub fn admits(&self, organization_id: Option<OrganizationId>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => organization_id == Some(*wanted),
        }
    }
}

impl Display for OrganizationSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for OrganizationSelector {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::Only)
            .map_err(|_| FilterError::InvalidOrganization(s.to_string()))
    }
}

impl TryFrom<String> for OrganizationSelector {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrganizationSelector> for String {
    fn from(value: OrganizationSelector) -> Self {
        value.to_string()
    }
}

impl From<OrganizationId> for OrganizationSelector {
    fn from(value: OrganizationId) -> Self {
        Self::Only(value)
    }
}

/// Which supervising category the breakdown is narrowed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategorySelector {
    #[default]
    All,
    Only(String),
}

impl CategorySelector {
    /// Whether a category passes the selector
    #[inline]
    #[must_use]
    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl Display for CategorySelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(category) => f.write_str(category),
        }
    }
}

impl FromStr for CategorySelector {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(FilterError::EmptyCategory)
        } else if s.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

impl TryFrom<String> for CategorySelector {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategorySelector> for String {
    fn from(value: CategorySelector) -> Self {
        value.to_string()
    }
}

/// Filter specification built by the caller once per render
///
/// Date bounds are inclusive whole days in UTC: a record requested at any
/// time on `end` still passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub organization: OrganizationSelector,
    #[serde(default)]
    pub category: CategorySelector,
}

impl FilterSpec {
    /// Filter that admits every record
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// With inclusive start date
    #[inline]
    #[must_use]
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// With inclusive end date
    #[inline]
    #[must_use]
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// With organization selector
    #[inline]
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<OrganizationSelector>) -> Self {
        self.organization = organization.into();
        self
    }

    /// With category selector
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: CategorySelector) -> Self {
        self.category = category;
        self
    }

    /// Whether a calendar day falls inside the date bounds
    #[inline]
    #[must_use]
    pub fn admits_date(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Reject specifications no record could ever satisfy
    ///
    /// # Errors
    /// Returns [`FilterError::InvertedRange`] when `start` is after `end`
    pub fn validate(&self) -> Result<(), FilterError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(FilterError::InvertedRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

/// Errors building a filter from caller input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Organization selector is neither `all` nor an integer id
    #[error("invalid organization selector `{0}`")]
    InvalidOrganization(String),

    /// Category selector is blank
    #[error("category selector must not be empty")]
    EmptyCategory,

    /// Start date after end date
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}
