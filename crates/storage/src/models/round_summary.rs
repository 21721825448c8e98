use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Aggregate statistics derived from a round's hole stats.
///
/// Averages and percentages are `None` when their denominator is zero, e.g.
/// `avg_par3` for a round without par 3 holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SummaryValues {
    pub avg_putts: Option<Decimal>,
    pub fairway_hit_pct: Option<Decimal>,
    pub green_hit_pct: Option<Decimal>,
    pub penalties: i32,
    pub avg_par3: Option<Decimal>,
    pub avg_par4: Option<Decimal>,
    pub avg_par5: Option<Decimal>,
}

/// Materialized summary row, at most one per round.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoundSummary {
    pub round_summary_id: Uuid,
    pub round_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub values: SummaryValues,
    pub computed_at: NaiveDateTime,
}

/// Round joined with its course name and materialized summary.
#[derive(Debug, Clone, FromRow)]
pub struct RoundWithSummary {
    pub round_id: Uuid,
    pub tee_time: NaiveDateTime,
    pub course_name: String,
    #[sqlx(flatten)]
    pub summary: SummaryValues,
}
