use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{BreakdownKind, HitOutcome};

/// Materialized count of one outcome bucket for one round summary.
///
/// Unique by `(round_summary_id, kind, bucket)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoricalBreakdown {
    pub breakdown_id: Uuid,
    pub round_summary_id: Uuid,
    pub kind: BreakdownKind,
    pub bucket: HitOutcome,
    pub count: i32,
}

/// Breakdown row ready to be written: updates `breakdown_id` when set,
/// inserts otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub breakdown_id: Option<Uuid>,
    pub round_summary_id: Uuid,
    pub kind: BreakdownKind,
    pub bucket: HitOutcome,
    pub count: i32,
}
