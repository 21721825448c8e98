use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{BreakdownKind, BreakdownRow, CategoricalBreakdown};

pub struct BreakdownRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BreakdownRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_summary(&self, round_summary_id: Uuid) -> Result<Vec<CategoricalBreakdown>> {
        let rows = sqlx::query_as::<_, CategoricalBreakdown>(
            r#"
            SELECT breakdown_id, round_summary_id, kind, bucket, count
            FROM round_breakdowns
            WHERE round_summary_id = $1
            ORDER BY kind, bucket
            "#,
        )
        .bind(round_summary_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Write a batch of rows in one transaction.
    ///
    /// Rows carrying an id are updated in place. New rows are inserted, and an
    /// insert racing another for the same `(summary, kind, bucket)` overwrites
    /// its count instead of adding a duplicate.
    pub async fn save_many(&self, rows: &[BreakdownRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for row in rows {
            match row.breakdown_id {
                Some(breakdown_id) => {
                    let result = sqlx::query(
                        r#"
                        UPDATE round_breakdowns
                        SET count = $2
                        WHERE breakdown_id = $1
                        "#,
                    )
                    .bind(breakdown_id)
                    .bind(row.count)
                    .execute(&mut *tx)
                    .await?;

                    if result.rows_affected() == 0 {
                        tracing::debug!(%breakdown_id, "breakdown row vanished before update");
                    }
                }
                None => {
                    sqlx::query(
                        r#"
                        INSERT INTO round_breakdowns (round_summary_id, kind, bucket, count)
                        VALUES ($1, $2, $3, $4)
                        ON CONFLICT (round_summary_id, kind, bucket)
                        DO UPDATE SET count = EXCLUDED.count
                        "#,
                    )
                    .bind(row.round_summary_id)
                    .bind(row.kind)
                    .bind(row.bucket)
                    .bind(row.count)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Breakdown rows of one kind across all of a player's rounds
    pub async fn list_for_player(
        &self,
        player_id: Uuid,
        kind: BreakdownKind,
    ) -> Result<Vec<CategoricalBreakdown>> {
        let rows = sqlx::query_as::<_, CategoricalBreakdown>(
            r#"
            SELECT b.breakdown_id, b.round_summary_id, b.kind, b.bucket, b.count
            FROM round_breakdowns b
            JOIN round_summaries rs ON b.round_summary_id = rs.round_summary_id
            JOIN rounds r ON rs.round_id = r.round_id
            WHERE r.player_id = $1 AND b.kind = $2
            "#,
        )
        .bind(player_id)
        .bind(kind)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
