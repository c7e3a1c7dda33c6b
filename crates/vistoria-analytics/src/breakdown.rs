//! Category breakdown
//!
//! Joins each filtered record to its organization's supervising category and
//! reports per-category totals. The category selector narrows the output, not
//! the input, so shares always reflect the whole filtered set.

use crate::index::OrganizationIndex;
use crate::share::Share;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vistoria_model::{CategorySelector, Record};

/// Requests under one supervising category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub total: usize,
    pub percentage: Share,
}

/// Build the breakdown, sorted descending by total (ties in first-seen order)
#[must_use]
pub fn build(
    records: &[&Record],
    organizations: &OrganizationIndex<'_>,
    selector: &CategorySelector,
) -> Vec<CategoryShare> {
    let filtered_total = records.len();

    let mut groups: IndexMap<&str, usize> = IndexMap::new();
    for record in records {
        let Some(category) = organizations
            .resolve(record.organization_id)
            .and_then(|org| org.category())
        else {
            continue;
        };
        *groups.entry(category).or_insert(0) += 1;
    }

    let mut shares: Vec<CategoryShare> = groups
        .into_iter()
        .filter(|(category, _)| selector.admits(category))
        .map(|(category, total)| CategoryShare {
            category: category.to_string(),
            total,
            percentage: Share::of(total, filtered_total),
        })
        .collect();

    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use vistoria_model::{Organization, OrganizationId, Status};

    fn fixture() -> (Vec<Organization>, Vec<Record>) {
        let orgs = vec![
            Organization::new(1, "Escola A", "EA").with_category("Educação"),
            Organization::new(2, "Posto B", "PB").with_category("Saúde"),
            Organization::new(3, "Escola C", "EC").with_category("Educação"),
            Organization::new(4, "Sem Setor", "SS"),
        ];
        let records = [2, 1, 3, 2, 4, 99, 2]
            .iter()
            .map(|id| Record::new("r", Some(OrganizationId(*id)), Utc::now(), Status::Pending))
            .collect();
        (orgs, records)
    }

    #[test]
    fn groups_by_resolved_category() {
        let (orgs, records) = fixture();
        let refs: Vec<&Record> = records.iter().collect();
        let shares = build(&refs, &OrganizationIndex::new(&orgs), &CategorySelector::All);

        assert_eq!(
            shares,
            vec![
                CategoryShare {
                    category: "Saúde".into(),
                    total: 3,
                    percentage: Share::of(3, 7),
                },
                CategoryShare {
                    category: "Educação".into(),
                    total: 2,
                    percentage: Share::of(2, 7),
                },
            ]
        );
        assert_eq!(shares[0].percentage.to_string(), "42.9");
    }

    #[test]
    fn selector_narrows_output_but_keeps_shares() {
        let (orgs, records) = fixture();
        let refs: Vec<&Record> = records.iter().collect();
        let index = OrganizationIndex::new(&orgs);

        let shares = build(&refs, &index, &CategorySelector::Only("Educação".into()));
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].total, 2);
        assert_eq!(shares[0].percentage.to_string(), "28.6");

        let none = build(&refs, &index, &CategorySelector::Only("Transporte".into()));
        assert!(none.is_empty());
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let orgs = vec![
            Organization::new(1, "A", "A").with_category("Beta"),
            Organization::new(2, "B", "B").with_category("Alfa"),
        ];
        let records: Vec<Record> = [1, 2]
            .iter()
            .map(|id| Record::new("r", Some(OrganizationId(*id)), Utc::now(), Status::Pending))
            .collect();
        let refs: Vec<&Record> = records.iter().collect();
        let shares = build(&refs, &OrganizationIndex::new(&orgs), &CategorySelector::All);
        let names: Vec<&str> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alfa"]);
    }

    #[test]
    fn empty_set_is_empty_breakdown() {
        let (orgs, _) = fixture();
        assert!(build(&[], &OrganizationIndex::new(&orgs), &CategorySelector::All).is_empty());
    }
}
