//! Organization ranking
//!
//! Groups the filtered set by organization, ranks the groups by request
//! count and folds everything past the top N into one synthetic "Others"
//! entry.
//!
//! # Ordering
//! Groups are kept in first-seen order and then stably sorted descending by
//! count, so on ties the organization that appeared first in the filtered
//! records keeps the earlier position.

use crate::index::OrganizationIndex;
use crate::share::Share;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vistoria_model::{OrganizationId, Record};

/// Number of organizations ranked before the rest are folded together
pub const DEFAULT_TOP_N: usize = 10;

/// One row of the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// `None` for the synthetic Others entry
    pub organization_id: Option<OrganizationId>,
    pub code: String,
    pub name: String,
    pub count: usize,
    pub percentage: Share,
}

impl RankedEntry {
    /// Whether this is the folded remainder
    #[inline]
    #[must_use]
    pub fn is_others(&self) -> bool {
        self.organization_id.is_none()
    }
}

/// Ranking output
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrganizationRanking {
    /// Top N followed by the Others entry when more groups exist
    pub ranked: Vec<RankedEntry>,
    /// Every resolved organization, same order, no Others entry
    pub all: Vec<RankedEntry>,
}

impl OrganizationRanking {
    /// The folded remainder, if any
    #[must_use]
    pub fn others(&self) -> Option<&RankedEntry> {
        self.ranked.last().filter(|e| e.is_others())
    }
}

/// Label of the folded remainder
#[must_use]
pub fn others_label(folded: usize) -> String {
    format!("Others ({folded})")
}

/// Rank with the default top ten
#[must_use]
pub fn build(records: &[&Record], organizations: &OrganizationIndex<'_>) -> OrganizationRanking {
    build_top(records, organizations, DEFAULT_TOP_N)
}

/// Rank keeping `top_n` organizations before folding the rest
///
/// Percentages use the whole filtered set as denominator. Records whose
/// organization is missing or not in the index are left out of the ranking.
/// A `top_n` of zero is treated as one.
#[must_use]
pub fn build_top(
    records: &[&Record],
    organizations: &OrganizationIndex<'_>,
    top_n: usize,
) -> OrganizationRanking {
    let top_n = top_n.max(1);
    let total = records.len();

    let mut groups: IndexMap<OrganizationId, usize> = IndexMap::new();
    for record in records {
        if let Some(id) = record.organization_id {
            *groups.entry(id).or_insert(0) += 1;
        }
    }

    let mut all: Vec<RankedEntry> = groups
        .into_iter()
        .filter_map(|(id, count)| {
            let Some(org) = organizations.resolve(Some(id)) else {
                tracing::trace!(organization_id = %id, count, "unresolved organization left out of ranking");
                return None;
            };
            Some(RankedEntry {
                organization_id: Some(id),
                code: org.short_code.clone(),
                name: org.name.clone(),
                count,
                percentage: Share::of(count, total),
            })
        })
        .collect();

    // Stable: ties keep first-seen order
    all.sort_by(|a, b| b.count.cmp(&a.count));

    let mut ranked: Vec<RankedEntry> = all.iter().take(top_n).cloned().collect();
    if all.len() > top_n {
        let rest = &all[top_n..];
        let count: usize = rest.iter().map(|e| e.count).sum();
        let label = others_label(rest.len());
        ranked.push(RankedEntry {
            organization_id: None,
            code: label.clone(),
            name: label,
            count,
            percentage: Share::of(count, total),
        });
    }

    OrganizationRanking { ranked, all }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use vistoria_model::{Organization, Status};

    fn records_for(orgs: &[i64]) -> Vec<Record> {
        orgs.iter()
            .map(|id| Record::new("r", Some(OrganizationId(*id)), Utc::now(), Status::Pending))
            .collect()
    }

    fn organizations(n: i64) -> Vec<Organization> {
        (1..=n)
            .map(|i| Organization::new(i, format!("Org {i}"), format!("O{i}")))
            .collect()
    }

    #[test]
    fn empty_set_is_empty_ranking() {
        let orgs = organizations(3);
        let ranking = build(&[], &OrganizationIndex::new(&orgs));
        assert_eq!(ranking, OrganizationRanking::default());
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let orgs = organizations(3);
        let records = records_for(&[3, 1, 2, 1, 3]);
        let refs: Vec<&Record> = records.iter().collect();
        let ranking = build(&refs, &OrganizationIndex::new(&orgs));

        let codes: Vec<&str> = ranking.ranked.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["O3", "O1", "O2"]);
        assert_eq!(ranking.ranked[0].percentage.to_string(), "40.0");
        assert_eq!(ranking.ranked[2].percentage.to_string(), "20.0");
    }

    #[test]
    fn unresolved_organizations_are_left_out() {
        let orgs = organizations(1);
        let mut records = records_for(&[1, 1, 99]);
        records.push(Record::new("r", None, Utc::now(), Status::Pending));
        let refs: Vec<&Record> = records.iter().collect();
        let ranking = build(&refs, &OrganizationIndex::new(&orgs));

        assert_eq!(ranking.ranked.len(), 1);
        assert_eq!(ranking.ranked[0].count, 2);
        // Denominator is still the whole filtered set
        assert_eq!(ranking.ranked[0].percentage.to_string(), "50.0");
    }

    #[test]
    fn overflow_folds_into_others() {
        let orgs = organizations(13);
        // Org i gets 14 - i records, so org 1 leads and 11..=13 overflow
        let ids: Vec<i64> = (1..=13).flat_map(|i| std::iter::repeat(i).take(14 - i as usize)).collect();
        let records = records_for(&ids);
        let refs: Vec<&Record> = records.iter().collect();
        let ranking = build(&refs, &OrganizationIndex::new(&orgs));

        assert_eq!(ranking.ranked.len(), 11);
        assert_eq!(ranking.all.len(), 13);
        let others = ranking.others().unwrap();
        assert_eq!(others.name, "Others (3)");
        assert_eq!(others.count, 3 + 2 + 1);
        assert!(ranking.all.iter().all(|e| !e.is_others()));
    }

    #[test]
    fn custom_top_n() {
        let orgs = organizations(4);
        let records = records_for(&[1, 1, 1, 2, 2, 3, 4]);
        let refs: Vec<&Record> = records.iter().collect();
        let ranking = build_top(&refs, &OrganizationIndex::new(&orgs), 2);

        assert_eq!(ranking.ranked.len(), 3);
        assert_eq!(ranking.ranked[2].code, "Others (2)");
        assert_eq!(ranking.ranked[2].count, 2);
        assert_eq!(ranking.ranked[2].percentage.to_string(), "28.6");
    }

    #[test]
    fn zero_top_n_keeps_the_leader() {
        let orgs = organizations(3);
        let records = records_for(&[2, 2, 1, 3]);
        let refs: Vec<&Record> = records.iter().collect();
        let ranking = build_top(&refs, &OrganizationIndex::new(&orgs), 0);

        assert_eq!(ranking.ranked.len(), 2);
        assert_eq!(ranking.ranked[0].code, "O2");
        assert_eq!(ranking.ranked[1].name, "Others (2)");
    }
}
