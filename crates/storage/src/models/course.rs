use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::NewHole;

/// Course reference data copied from the catalog for a single round.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub course_id: Uuid,
    pub round_id: Uuid,
    pub name: String,
    pub marker: String,
    pub slope: i32,
    pub rating: Decimal,
    pub total_par: i32,
    pub total_yards: i32,
    pub total_meters: i32,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub marker: String,
    pub slope: i32,
    pub rating: Decimal,
    pub total_par: i32,
    pub total_yards: i32,
    pub total_meters: i32,
    pub holes: Vec<NewHole>,
}
