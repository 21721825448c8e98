use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::NewCourse;

/// One played instance of a course by one player.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Round {
    pub round_id: Uuid,
    pub player_id: Uuid,
    pub tee_time: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Round joined with the course it was played on.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoundOverview {
    pub round_id: Uuid,
    pub tee_time: NaiveDateTime,
    pub course_name: String,
    pub marker: String,
}

/// Everything stored when a round is created: the round, its course and holes.
#[derive(Debug, Clone)]
pub struct NewRound {
    pub player_id: Uuid,
    pub tee_time: NaiveDateTime,
    pub course: NewCourse,
}
