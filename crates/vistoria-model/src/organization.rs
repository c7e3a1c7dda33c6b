//! Organizations of the institutional hierarchy

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of an organization
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrganizationId(pub i64);

impl OrganizationId {
    /// Raw integer value
    #[inline]
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for OrganizationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganizationId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for OrganizationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A unit of the institutional hierarchy that requests are filed under
///
/// Supplied wholesale by the organization source and treated as a lookup
/// table keyed by [`OrganizationId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub short_code: String,
    /// Supervising department; `None` when the hierarchy leaves it unset
    #[serde(default)]
    pub category: Option<String>,
}

impl Organization {
    /// Create an organization without a category
    #[must_use]
    pub fn new(
        id: impl Into<OrganizationId>,
        name: impl Into<String>,
        short_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_code: short_code.into(),
            category: None,
        }
    }

    /// With supervising category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Category, ignoring blank values
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Errors raised when an upstream organization row cannot be typed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrganizationError {
    /// Required field absent
    #[error("organization row missing field `{0}`")]
    MissingField(&'static str),

    /// Identifier is not an integer
    #[error("invalid organization id `{0}`")]
    InvalidId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parses_trimmed_integers() {
        assert_eq!(" 42 ".parse::<OrganizationId>().unwrap(), OrganizationId(42));
        assert!("abc".parse::<OrganizationId>().is_err());
    }

    #[test]
    fn blank_category_is_none() {
        let org = Organization::new(1, "Prefeitura", "PRF").with_category("  ");
        assert_eq!(org.category(), None);

        let org = Organization::new(1, "Prefeitura", "PRF").with_category(" Obras ");
        assert_eq!(org.category(), Some("Obras"));
    }

    #[test]
    fn serde_uses_camel_case() {
        let org = Organization::new(7, "Secretaria de Obras", "SEOB").with_category("Infra");
        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["shortCode"], "SEOB");
        assert_eq!(json["id"], 7);

        let back: Organization = serde_json::from_value(json).unwrap();
        assert_eq!(back, org);
    }
}
