use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use vistoria_analytics::{aggregate, AggregationResult, Share};
use vistoria_model::{FilterSpec, OrganizationId, OrganizationSelector, Record};
use vistoria_test_utils::{day, many_organizations, record, ts};

const STATUSES: [&str; 5] = ["pending", "in_progress", "completed", "cancelled", "archived"];

fn arb_records(max_orgs: i64) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (1..=max_orgs, 0i64..3_000, 0usize..STATUSES.len()),
        0..200,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (org, offset_days, status))| {
                let at = ts(2020, 1, 1) + Duration::days(offset_days);
                record(i as u64, org, at, STATUSES[status])
            })
            .collect()
    })
}

fn arb_filter(max_orgs: i64) -> impl Strategy<Value = FilterSpec> {
    (
        prop::option::of(0i64..3_000),
        prop::option::of(0i64..3_000),
        prop::option::of(1..=max_orgs),
    )
        .prop_map(|(start, end, org)| {
            let base: NaiveDate = day(2020, 1, 1);
            FilterSpec {
                start: start.map(|d| base + Duration::days(d)),
                end: end.map(|d| base + Duration::days(d)),
                organization: org.map_or(OrganizationSelector::All, |id| {
                    OrganizationSelector::Only(OrganizationId(id))
                }),
                ..FilterSpec::default()
            }
        })
}

fn ranking_share_sum(result: &AggregationResult) -> f64 {
    result
        .ranking
        .ranked
        .iter()
        .map(|e| e.percentage.value())
        .sum()
}

proptest! {
    #[test]
    fn prop_filtered_count_equals_total(records in arb_records(15), filter in arb_filter(15)) {
        let result = aggregate(&records, &filter, &many_organizations(15));
        prop_assert_eq!(result.filtered_count, result.stats.total);
        prop_assert!(result.filtered_count <= records.len());
        prop_assert!(result.stats.pending + result.stats.completed + result.stats.in_progress <= result.stats.total);
    }

    #[test]
    fn prop_received_sums_to_filtered_count(records in arb_records(15), filter in arb_filter(15)) {
        let result = aggregate(&records, &filter, &many_organizations(15));
        let received: usize = result.time_series.iter().map(|p| p.received).sum();
        prop_assert_eq!(received, result.filtered_count);
        for point in &result.time_series {
            prop_assert!(point.completed <= point.received);
        }
    }

    #[test]
    fn prop_time_series_strictly_ascending(records in arb_records(15)) {
        let result = aggregate(&records, &FilterSpec::all(), &many_organizations(15));
        for pair in result.time_series.windows(2) {
            prop_assert!(pair[0].key() < pair[1].key());
        }
    }

    #[test]
    fn prop_ranking_shares_sum_to_hundred(records in arb_records(25), filter in arb_filter(25)) {
        let result = aggregate(&records, &filter, &many_organizations(25));
        if result.is_empty() {
            prop_assert!(result.ranking.ranked.is_empty());
        } else {
            // One rounding step per entry, at most eleven entries
            let sum = ranking_share_sum(&result);
            let slack = 0.05 * result.ranking.ranked.len() as f64 + 1e-9;
            prop_assert!((sum - 100.0).abs() <= slack.max(0.1), "sum was {}", sum);
        }
    }

    #[test]
    fn prop_ranking_sorted_and_others_last(records in arb_records(25)) {
        let result = aggregate(&records, &FilterSpec::all(), &many_organizations(25));
        let ranked = &result.ranking.ranked;
        prop_assert!(ranked.len() <= 11);

        let named: Vec<_> = ranked.iter().filter(|e| !e.is_others()).collect();
        for pair in named.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }

        if let Some(others) = result.ranking.others() {
            let folded: usize = result.ranking.all[10..].iter().map(|e| e.count).sum();
            prop_assert_eq!(others.count, folded);
            prop_assert_eq!(others.name.clone(), format!("Others ({})", result.ranking.all.len() - 10));
        } else {
            prop_assert!(result.ranking.all.len() <= 10);
        }
    }

    #[test]
    fn prop_aggregation_is_idempotent(records in arb_records(15), filter in arb_filter(15)) {
        let orgs = many_organizations(15);
        let first = aggregate(&records, &filter, &orgs);
        let second = aggregate(&records, &filter, &orgs);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_breakdown_totals_match_resolved_records(records in arb_records(15)) {
        let result = aggregate(&records, &FilterSpec::all(), &many_organizations(15));
        let categorized: usize = result.breakdown.iter().map(|c| c.total).sum();
        prop_assert_eq!(categorized, result.filtered_count);
    }
}

#[test]
fn empty_share_is_zero_string() {
    assert_eq!(Share::of(0, 0).to_string(), "0.0");
}
