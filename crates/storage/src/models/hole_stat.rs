use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::HitOutcome;

/// Business fields of a player's performance on one hole.
///
/// Identity (`hole_stat_id`, `hole_id`) lives on [`HoleStat`], so equality on
/// this type compares exactly what a player can change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HoleStatValues {
    pub score: i32,
    pub putts: i32,
    pub penalties: i32,
    pub fairway_hit: HitOutcome,
    pub green_hit: HitOutcome,
    pub pin_location: String,
}

/// Stored hole stat row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HoleStat {
    pub hole_stat_id: Uuid,
    pub hole_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub values: HoleStatValues,
    pub updated_at: NaiveDateTime,
}

/// A recorded hole stat joined with the par of its hole.
#[derive(Debug, Clone, FromRow)]
pub struct HolePerformance {
    pub hole_id: Uuid,
    pub par: i32,
    #[sqlx(flatten)]
    pub values: HoleStatValues,
}
