//! Error types for the dashboard service
//!
//! The aggregation itself cannot fail. Everything here comes from the edges:
//! - Invalid caller filters
//! - Collaborator fetch failures
//! - Bad configuration

use vistoria_model::{FilterError, FingerprintError};

/// Failure reported by a record or organization source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Backend unreachable or timed out
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Credentials rejected
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Response could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Main dashboard error type
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Filter rejected before any fetch
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    /// Record fetch failed
    #[error("record source failed: {0}")]
    RecordSource(#[source] SourceError),

    /// Organization fetch failed
    #[error("organization source failed: {0}")]
    OrganizationSource(#[source] SourceError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Inputs could not be fingerprinted
    #[error("fingerprint failed: {0}")]
    Fingerprint(#[from] FingerprintError),
}

impl DashboardError {
    /// Check if the same refresh may succeed when retried
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RecordSource(SourceError::Unavailable(_))
                | Self::OrganizationSource(SourceError::Unavailable(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_sources_are_retryable() {
        assert!(DashboardError::RecordSource(SourceError::Unavailable("timeout".into())).is_retryable());
        assert!(!DashboardError::RecordSource(SourceError::Unauthorized("expired".into())).is_retryable());
        assert!(!DashboardError::Config("top_n".into()).is_retryable());
        assert!(!DashboardError::InvalidFilter(FilterError::EmptyCategory).is_retryable());
    }

    #[test]
    fn messages_chain_the_source() {
        let err = DashboardError::OrganizationSource(SourceError::Malformed("missing id".into()));
        assert_eq!(
            err.to_string(),
            "organization source failed: malformed response: missing id"
        );
    }
}
