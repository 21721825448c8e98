use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{HitOutcome, HolePerformance, RoundSummary, SummaryValues};
use crate::store::AggregateStore;

/// Running totals for one par bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParTotals {
    pub score: i32,
    pub holes: u32,
}

/// Totals accumulated in a single pass over a round's hole stats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundTotals {
    pub holes: u32,
    pub putts: i32,
    pub penalties: i32,
    /// Holes where the fairway outcome is not `NOT_APPLICABLE`.
    pub fairway_eligible: u32,
    pub fairways_hit: u32,
    pub greens_hit: u32,
    pub par3: ParTotals,
    pub par4: ParTotals,
    pub par5: ParTotals,
}

impl RoundTotals {
    pub fn accumulate(performances: &[HolePerformance]) -> Self {
        let mut totals = Self::default();

        for performance in performances {
            let stat = &performance.values;

            totals.holes += 1;
            totals.putts += stat.putts;
            totals.penalties += stat.penalties;

            if stat.fairway_hit != HitOutcome::NotApplicable {
                totals.fairway_eligible += 1;
            }
            if stat.fairway_hit == HitOutcome::Hit {
                totals.fairways_hit += 1;
            }
            if stat.green_hit == HitOutcome::Hit {
                totals.greens_hit += 1;
            }

            let bucket = match performance.par {
                3 => &mut totals.par3,
                4 => &mut totals.par4,
                5 => &mut totals.par5,
                _ => continue,
            };
            bucket.score += stat.score;
            bucket.holes += 1;
        }

        totals
    }

    pub fn summarize(&self) -> SummaryValues {
        SummaryValues {
            avg_putts: average(self.putts, self.holes),
            fairway_hit_pct: percentage(self.fairways_hit, self.fairway_eligible),
            green_hit_pct: percentage(self.greens_hit, self.holes),
            penalties: self.penalties,
            avg_par3: average(self.par3.score, self.par3.holes),
            avg_par4: average(self.par4.score, self.par4.holes),
            avg_par5: average(self.par5.score, self.par5.holes),
        }
    }
}

/// `None` when there is nothing to average over.
fn average(sum: i32, count: u32) -> Option<Decimal> {
    Decimal::from(sum)
        .checked_div(Decimal::from(count))
        .map(|avg| avg.round_dp(2))
}

fn percentage(hits: u32, count: u32) -> Option<Decimal> {
    (Decimal::from(hits) * Decimal::ONE_HUNDRED)
        .checked_div(Decimal::from(count))
        .map(|pct| pct.round_dp(2))
}

pub fn summarize_round(performances: &[HolePerformance]) -> SummaryValues {
    RoundTotals::accumulate(performances).summarize()
}

/// Writes the summary for a round, reusing the existing row when there is one.
pub async fn upsert_round_summary<S>(
    store: &S,
    round_id: Uuid,
    values: SummaryValues,
) -> Result<RoundSummary>
where
    S: AggregateStore + ?Sized,
{
    match store.find_round_summary(round_id).await? {
        Some(existing) => {
            let rows = store
                .update_round_summary(existing.round_summary_id, &values)
                .await?;
            if rows == 0 {
                tracing::debug!(%round_id, "round summary update affected no rows");
            }

            Ok(RoundSummary { values, ..existing })
        }
        None => store.insert_round_summary(round_id, &values).await,
    }
}
