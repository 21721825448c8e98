use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{HolePerformance, HoleStat, HoleStatValues};

pub struct HoleStatRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HoleStatRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_hole_id(&self, hole_id: Uuid) -> Result<Option<HoleStat>> {
        let stat = sqlx::query_as::<_, HoleStat>(
            r#"
            SELECT hole_stat_id, hole_id, score, putts, penalties,
                   fairway_hit, green_hit, pin_location, updated_at
            FROM hole_stats
            WHERE hole_id = $1
            "#,
        )
        .bind(hole_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(stat)
    }

    /// Inserts the stat, overwriting the values when the hole already has one.
    pub async fn insert(&self, hole_id: Uuid, values: &HoleStatValues) -> Result<Uuid> {
        let hole_stat_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO hole_stats (hole_id, score, putts, penalties, fairway_hit, green_hit, pin_location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (hole_id) DO UPDATE
            SET score = EXCLUDED.score,
                putts = EXCLUDED.putts,
                penalties = EXCLUDED.penalties,
                fairway_hit = EXCLUDED.fairway_hit,
                green_hit = EXCLUDED.green_hit,
                pin_location = EXCLUDED.pin_location,
                updated_at = CURRENT_TIMESTAMP
            RETURNING hole_stat_id
            "#,
        )
        .bind(hole_id)
        .bind(values.score)
        .bind(values.putts)
        .bind(values.penalties)
        .bind(values.fairway_hit)
        .bind(values.green_hit)
        .bind(&values.pin_location)
        .fetch_one(self.pool)
        .await?;

        Ok(hole_stat_id)
    }

    /// Returns the number of rows affected; zero when the row is gone
    pub async fn update(&self, hole_stat_id: Uuid, values: &HoleStatValues) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE hole_stats
            SET score = $2,
                putts = $3,
                penalties = $4,
                fairway_hit = $5,
                green_hit = $6,
                pin_location = $7,
                updated_at = CURRENT_TIMESTAMP
            WHERE hole_stat_id = $1
            "#,
        )
        .bind(hole_stat_id)
        .bind(values.score)
        .bind(values.putts)
        .bind(values.penalties)
        .bind(values.fairway_hit)
        .bind(values.green_hit)
        .bind(&values.pin_location)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Every recorded hole stat of a round, with the par of its hole
    pub async fn list_performances_for_round(&self, round_id: Uuid) -> Result<Vec<HolePerformance>> {
        let performances = sqlx::query_as::<_, HolePerformance>(
            r#"
            SELECT h.hole_id, h.par, hs.score, hs.putts, hs.penalties,
                   hs.fairway_hit, hs.green_hit, hs.pin_location
            FROM hole_stats hs
            JOIN holes h ON hs.hole_id = h.hole_id
            JOIN courses c ON h.course_id = c.course_id
            WHERE c.round_id = $1
            ORDER BY h.number
            "#,
        )
        .bind(round_id)
        .fetch_all(self.pool)
        .await?;

        Ok(performances)
    }
}
