use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{RoundSummary, RoundWithSummary, SummaryValues};

pub struct SummaryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SummaryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_round_id(&self, round_id: Uuid) -> Result<Option<RoundSummary>> {
        let summary = sqlx::query_as::<_, RoundSummary>(
            r#"
            SELECT round_summary_id, round_id, avg_putts, fairway_hit_pct, green_hit_pct,
                   penalties, avg_par3, avg_par4, avg_par5, computed_at
            FROM round_summaries
            WHERE round_id = $1
            "#,
        )
        .bind(round_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(summary)
    }

    /// Insert a summary; a concurrent insert for the same round turns into an update
    pub async fn insert(&self, round_id: Uuid, values: &SummaryValues) -> Result<RoundSummary> {
        let summary = sqlx::query_as::<_, RoundSummary>(
            r#"
            INSERT INTO round_summaries
                (round_id, avg_putts, fairway_hit_pct, green_hit_pct, penalties, avg_par3, avg_par4, avg_par5)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (round_id)
            DO UPDATE SET
                avg_putts = EXCLUDED.avg_putts,
                fairway_hit_pct = EXCLUDED.fairway_hit_pct,
                green_hit_pct = EXCLUDED.green_hit_pct,
                penalties = EXCLUDED.penalties,
                avg_par3 = EXCLUDED.avg_par3,
                avg_par4 = EXCLUDED.avg_par4,
                avg_par5 = EXCLUDED.avg_par5,
                computed_at = CURRENT_TIMESTAMP
            RETURNING round_summary_id, round_id, avg_putts, fairway_hit_pct, green_hit_pct,
                      penalties, avg_par3, avg_par4, avg_par5, computed_at
            "#,
        )
        .bind(round_id)
        .bind(values.avg_putts)
        .bind(values.fairway_hit_pct)
        .bind(values.green_hit_pct)
        .bind(values.penalties)
        .bind(values.avg_par3)
        .bind(values.avg_par4)
        .bind(values.avg_par5)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn update(&self, round_summary_id: Uuid, values: &SummaryValues) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE round_summaries
            SET avg_putts = $2,
                fairway_hit_pct = $3,
                green_hit_pct = $4,
                penalties = $5,
                avg_par3 = $6,
                avg_par4 = $7,
                avg_par5 = $8,
                computed_at = CURRENT_TIMESTAMP
            WHERE round_summary_id = $1
            "#,
        )
        .bind(round_summary_id)
        .bind(values.avg_putts)
        .bind(values.fairway_hit_pct)
        .bind(values.green_hit_pct)
        .bind(values.penalties)
        .bind(values.avg_par3)
        .bind(values.avg_par4)
        .bind(values.avg_par5)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Summarized rounds of a player in tee time order
    pub async fn list_for_player(&self, player_id: Uuid) -> Result<Vec<RoundWithSummary>> {
        let rounds = sqlx::query_as::<_, RoundWithSummary>(
            r#"
            SELECT r.round_id, r.tee_time, c.name AS course_name,
                   rs.avg_putts, rs.fairway_hit_pct, rs.green_hit_pct, rs.penalties,
                   rs.avg_par3, rs.avg_par4, rs.avg_par5
            FROM rounds r
            JOIN courses c ON c.round_id = r.round_id
            JOIN round_summaries rs ON rs.round_id = r.round_id
            WHERE r.player_id = $1
            ORDER BY r.tee_time ASC
            "#,
        )
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rounds)
    }
}
