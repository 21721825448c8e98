use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CategoricalBreakdown, Hole, RoundOverview, RoundSummary};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoundRequest {
    /// Course id in the course catalog.
    #[validate(range(min = 1, message = "course_id is required"))]
    pub course_id: i64,

    /// Marker (tee box) id within the catalog course.
    #[validate(range(min = 1, message = "marker_id is required"))]
    pub marker_id: i64,

    pub tee_time: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundResponse {
    pub round_id: Uuid,
    pub course_name: String,
    pub marker: String,
    pub tee_time: NaiveDateTime,
}

impl From<RoundOverview> for RoundResponse {
    fn from(round: RoundOverview) -> Self {
        Self {
            round_id: round.round_id,
            course_name: round.course_name,
            marker: round.marker,
            tee_time: round.tee_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HoleResponse {
    pub hole_id: Uuid,
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub yardage: i32,
    pub meters: i32,
}

impl From<Hole> for HoleResponse {
    fn from(hole: Hole) -> Self {
        Self {
            hole_id: hole.hole_id,
            number: hole.number,
            par: hole.par,
            stroke_index: hole.stroke_index,
            yardage: hole.distance_yards,
            meters: hole.distance_meters,
        }
    }
}

/// Materialized statistics of a round with its outcome breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundSummaryResponse {
    pub summary: RoundSummary,
    pub breakdowns: Vec<CategoricalBreakdown>,
}
