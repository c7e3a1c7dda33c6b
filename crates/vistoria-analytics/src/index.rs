//! Organization lookup table

use std::collections::HashMap;
use vistoria_model::{Organization, OrganizationId};

/// Organizations keyed by id, borrowed from the reference set
///
/// When the reference set repeats an id, the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct OrganizationIndex<'a> {
    by_id: HashMap<OrganizationId, &'a Organization>,
}

impl<'a> OrganizationIndex<'a> {
    /// Index a reference set
    #[must_use]
    pub fn new(organizations: &'a [Organization]) -> Self {
        let mut by_id = HashMap::with_capacity(organizations.len());
        for org in organizations {
            by_id.entry(org.id).or_insert(org);
        }
        Self { by_id }
    }

    /// Resolve an optional foreign key
    #[inline]
    #[must_use]
    pub fn resolve(&self, id: Option<OrganizationId>) -> Option<&'a Organization> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }

    /// Number of distinct organizations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the reference set was empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
