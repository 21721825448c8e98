use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::dto::chart::{ChartPoint, LineChartFilter, PieSlice};
use crate::error::{StatsError, StatsResult};
use crate::models::{BreakdownKind, HitOutcome};
use crate::store::AggregateStore;

/// One point per summarized round of the player, oldest first.
///
/// Reads materialized summaries only. Rounds teed off at or before the
/// filter's lower bound are left out.
pub async fn line_series<S>(
    store: &S,
    player_id: Uuid,
    filter: &LineChartFilter,
    now: NaiveDateTime,
) -> StatsResult<Vec<ChartPoint>>
where
    S: AggregateStore + ?Sized,
{
    let lower_bound = filter.lower_bound(now).map_err(StatsError::InvalidRequest)?;

    let mut rounds = store.list_player_summaries(player_id).await?;
    rounds.sort_by_key(|r| r.tee_time);

    Ok(rounds
        .into_iter()
        .filter(|r| lower_bound.is_none_or(|bound| r.tee_time > bound))
        .map(|r| ChartPoint {
            label: format!("{} - {}", r.course_name, r.tee_time.format("%Y-%m-%d")),
            value: filter.stat.value_of(&r.summary).and_then(|v| v.to_f64()),
        })
        .collect())
}

/// Outcome counts of one kind summed over all rounds of the player.
pub async fn pie_breakdown<S>(
    store: &S,
    player_id: Uuid,
    kind: BreakdownKind,
) -> StatsResult<Vec<PieSlice>>
where
    S: AggregateStore + ?Sized,
{
    let breakdowns = store.list_player_breakdowns(player_id, kind).await?;

    let mut totals: BTreeMap<HitOutcome, i64> = BTreeMap::new();
    for breakdown in breakdowns {
        if kind == BreakdownKind::Fairway && breakdown.bucket == HitOutcome::NotApplicable {
            continue;
        }
        *totals.entry(breakdown.bucket).or_insert(0) += i64::from(breakdown.count);
    }

    Ok(totals
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(bucket, count)| PieSlice { bucket, count })
        .collect())
}
