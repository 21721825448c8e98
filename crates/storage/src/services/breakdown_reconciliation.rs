use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    BreakdownKind, BreakdownRow, CategoricalBreakdown, HitOutcome, HolePerformance, RoundSummary,
};
use crate::store::AggregateStore;

pub type FrequencyTable = BTreeMap<HitOutcome, i32>;

/// Counts outcomes per bucket for one breakdown kind.
pub fn frequency_table(kind: BreakdownKind, performances: &[HolePerformance]) -> FrequencyTable {
    let mut counts = FrequencyTable::new();
    for performance in performances {
        *counts.entry(kind.outcome_of(&performance.values)).or_insert(0) += 1;
    }
    counts
}

/// Merges freshly computed counts into the persisted rows of a summary.
///
/// Buckets that already have a row keep its id. Buckets that no longer occur
/// are written back with a count of zero so the persisted state matches the
/// fresh counts without deleting rows.
pub fn merge_breakdowns(
    round_summary_id: Uuid,
    kind: BreakdownKind,
    existing: &[CategoricalBreakdown],
    counts: &FrequencyTable,
) -> Vec<BreakdownRow> {
    let existing: BTreeMap<HitOutcome, &CategoricalBreakdown> = existing
        .iter()
        .filter(|b| b.round_summary_id == round_summary_id && b.kind == kind)
        .map(|b| (b.bucket, b))
        .collect();

    let mut rows: Vec<BreakdownRow> = counts
        .iter()
        .map(|(&bucket, &count)| BreakdownRow {
            breakdown_id: existing.get(&bucket).map(|b| b.breakdown_id),
            round_summary_id,
            kind,
            bucket,
            count,
        })
        .collect();

    rows.extend(
        existing
            .values()
            .filter(|b| !counts.contains_key(&b.bucket) && b.count != 0)
            .map(|b| BreakdownRow {
                breakdown_id: Some(b.breakdown_id),
                round_summary_id,
                kind,
                bucket: b.bucket,
                count: 0,
            }),
    );

    rows
}

/// Brings the fairway and green breakdowns of a summary in line with the
/// given performances.
pub async fn reconcile_breakdowns<S>(
    store: &S,
    summary: &RoundSummary,
    performances: &[HolePerformance],
) -> Result<()>
where
    S: AggregateStore + ?Sized,
{
    let existing = store.list_breakdowns(summary.round_summary_id).await?;

    for kind in [BreakdownKind::Fairway, BreakdownKind::Green] {
        let counts = frequency_table(kind, performances);
        let rows = merge_breakdowns(summary.round_summary_id, kind, &existing, &counts);
        if rows.is_empty() {
            continue;
        }

        tracing::debug!(
            round_summary_id = %summary.round_summary_id,
            ?kind,
            rows = rows.len(),
            "Saving breakdowns"
        );
        store.save_breakdowns(&rows).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use crate::services::recompute::recompute_round;
    use crate::store::{HoleStatStore, MemoryStore, RoundStore};

    fn performance(fairway: HitOutcome, green: HitOutcome) -> HolePerformance {
        HolePerformance {
            hole_id: Uuid::new_v4(),
            par: 4,
            values: fixtures::stat(4, 2, fairway, green),
        }
    }

    fn breakdown(summary: Uuid, bucket: HitOutcome, count: i32) -> CategoricalBreakdown {
        CategoricalBreakdown {
            breakdown_id: Uuid::new_v4(),
            round_summary_id: summary,
            kind: BreakdownKind::Fairway,
            bucket,
            count,
        }
    }

    #[test]
    fn test_frequency_table() {
        let performances = vec![
            performance(HitOutcome::Hit, HitOutcome::Hit),
            performance(HitOutcome::Left, HitOutcome::Left),
            performance(HitOutcome::NotApplicable, HitOutcome::Hit),
        ];

        let fairway = frequency_table(BreakdownKind::Fairway, &performances);
        assert_eq!(fairway.get(&HitOutcome::Hit), Some(&1));
        assert_eq!(fairway.get(&HitOutcome::Left), Some(&1));
        assert_eq!(fairway.get(&HitOutcome::NotApplicable), Some(&1));

        let green = frequency_table(BreakdownKind::Green, &performances);
        assert_eq!(green.get(&HitOutcome::Hit), Some(&2));
        assert_eq!(green.get(&HitOutcome::Left), Some(&1));
        assert_eq!(green.len(), 2);
    }

    #[test]
    fn test_merge_reuses_ids_and_zeroes_stale_buckets() {
        let summary = Uuid::new_v4();
        let hit = breakdown(summary, HitOutcome::Hit, 2);
        let left = breakdown(summary, HitOutcome::Left, 1);

        let counts = FrequencyTable::from([(HitOutcome::Hit, 3), (HitOutcome::Right, 1)]);
        let rows = merge_breakdowns(
            summary,
            BreakdownKind::Fairway,
            &[hit.clone(), left.clone()],
            &counts,
        );

        assert_eq!(rows.len(), 3);

        let by_bucket = |bucket: HitOutcome| rows.iter().find(|r| r.bucket == bucket).unwrap();
        assert_eq!(by_bucket(HitOutcome::Hit).breakdown_id, Some(hit.breakdown_id));
        assert_eq!(by_bucket(HitOutcome::Hit).count, 3);
        assert_eq!(by_bucket(HitOutcome::Right).breakdown_id, None);
        assert_eq!(by_bucket(HitOutcome::Left).breakdown_id, Some(left.breakdown_id));
        assert_eq!(by_bucket(HitOutcome::Left).count, 0);
    }

    #[test]
    fn test_merge_skips_already_zeroed_buckets() {
        let summary = Uuid::new_v4();
        let zeroed = breakdown(summary, HitOutcome::Short, 0);

        let counts = FrequencyTable::from([(HitOutcome::Hit, 1)]);
        let rows = merge_breakdowns(summary, BreakdownKind::Fairway, &[zeroed], &counts);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket, HitOutcome::Hit);
    }

    #[tokio::test]
    async fn test_reconcile_is_stable_across_recomputes() {
        let store = MemoryStore::new();
        let player = fixtures::player(&store, "alice").await;
        let round = fixtures::round(&store, &player, "2024-05-01 08:00", &[4, 4]).await;
        let holes = store.list_round_holes(round.round_id).await.unwrap();

        store
            .insert_hole_stat(
                holes[0].hole_id,
                &fixtures::stat(4, 2, HitOutcome::Hit, HitOutcome::Hit),
            )
            .await
            .unwrap();
        let second = store
            .insert_hole_stat(
                holes[1].hole_id,
                &fixtures::stat(5, 2, HitOutcome::Left, HitOutcome::Short),
            )
            .await
            .unwrap();

        let summary = recompute_round(&store, round.round_id).await.unwrap();
        let first_pass = store.list_breakdowns(summary.round_summary_id).await.unwrap();
        assert_eq!(first_pass.len(), 4);

        // Move the second tee shot from LEFT to HIT.
        store
            .update_hole_stat(
                second,
                &fixtures::stat(4, 2, HitOutcome::Hit, HitOutcome::Short),
            )
            .await
            .unwrap();
        recompute_round(&store, round.round_id).await.unwrap();

        let second_pass = store.list_breakdowns(summary.round_summary_id).await.unwrap();
        assert_eq!(second_pass.len(), 4);

        let find = |rows: &[CategoricalBreakdown], kind: BreakdownKind, bucket: HitOutcome| {
            rows.iter()
                .find(|b| b.kind == kind && b.bucket == bucket)
                .cloned()
                .unwrap()
        };

        let hit_before = find(&first_pass, BreakdownKind::Fairway, HitOutcome::Hit);
        let hit_after = find(&second_pass, BreakdownKind::Fairway, HitOutcome::Hit);
        assert_eq!(hit_before.breakdown_id, hit_after.breakdown_id);
        assert_eq!(hit_after.count, 2);

        let left_after = find(&second_pass, BreakdownKind::Fairway, HitOutcome::Left);
        assert_eq!(left_after.count, 0);
    }
}
