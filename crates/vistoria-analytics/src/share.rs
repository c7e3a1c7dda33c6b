//! Percentage shares rounded for display

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A percentage of the filtered total, rounded to one decimal place
///
/// Renders and serializes as a string with exactly one decimal
/// (`"66.7"`, `"100.0"`, `"0.0"`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Share(f64);

impl Share {
    /// The share reported for every entry of an empty set
    pub const ZERO: Self = Self(0.0);

    /// Share of `count` in `total`; zero when `total` is zero
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(count: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        Self(round1(count as f64 / total as f64 * 100.0))
    }

    /// Rounded numeric value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl Display for Share {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl FromStr for Share {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(|v| Self(round1(v)))
    }
}

impl serde::Serialize for Share {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Share {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
