use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hole {
    pub hole_id: Uuid,
    pub course_id: Uuid,
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub distance_yards: i32,
    pub distance_meters: i32,
}

#[derive(Debug, Clone)]
pub struct NewHole {
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub distance_yards: i32,
    pub distance_meters: i32,
}
