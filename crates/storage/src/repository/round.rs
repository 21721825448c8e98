use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Hole, NewRound, Round, RoundOverview};

pub struct RoundRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoundRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a round together with its course and holes in one transaction
    pub async fn create_with_course(&self, new_round: &NewRound) -> Result<Round> {
        let mut tx = self.pool.begin().await?;

        let round = sqlx::query_as::<_, Round>(
            r#"
            INSERT INTO rounds (player_id, tee_time)
            VALUES ($1, $2)
            RETURNING round_id, player_id, tee_time, created_at
            "#,
        )
        .bind(new_round.player_id)
        .bind(new_round.tee_time)
        .fetch_one(&mut *tx)
        .await?;

        let course = &new_round.course;
        let course_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO courses (round_id, name, marker, slope, rating, total_par, total_yards, total_meters)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING course_id
            "#,
        )
        .bind(round.round_id)
        .bind(&course.name)
        .bind(&course.marker)
        .bind(course.slope)
        .bind(course.rating)
        .bind(course.total_par)
        .bind(course.total_yards)
        .bind(course.total_meters)
        .fetch_one(&mut *tx)
        .await?;

        for hole in &course.holes {
            sqlx::query(
                r#"
                INSERT INTO holes (course_id, number, par, stroke_index, distance_yards, distance_meters)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(course_id)
            .bind(hole.number)
            .bind(hole.par)
            .bind(hole.stroke_index)
            .bind(hole.distance_yards)
            .bind(hole.distance_meters)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(round)
    }

    pub async fn find_by_id(&self, round_id: Uuid) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(
            r#"
            SELECT round_id, player_id, tee_time, created_at
            FROM rounds
            WHERE round_id = $1
            "#,
        )
        .bind(round_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(round)
    }

    pub async fn find_overview(&self, round_id: Uuid) -> Result<RoundOverview> {
        let round = sqlx::query_as::<_, RoundOverview>(
            r#"
            SELECT r.round_id, r.tee_time, c.name AS course_name, c.marker
            FROM rounds r
            JOIN courses c ON c.round_id = r.round_id
            WHERE r.round_id = $1
            "#,
        )
        .bind(round_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(round)
    }

    /// List a player's rounds, newest first
    pub async fn list_for_player(&self, player_id: Uuid) -> Result<Vec<RoundOverview>> {
        let rounds = sqlx::query_as::<_, RoundOverview>(
            r#"
            SELECT r.round_id, r.tee_time, c.name AS course_name, c.marker
            FROM rounds r
            JOIN courses c ON c.round_id = r.round_id
            WHERE r.player_id = $1
            ORDER BY r.tee_time DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rounds)
    }

    pub async fn list_holes(&self, round_id: Uuid) -> Result<Vec<Hole>> {
        let holes = sqlx::query_as::<_, Hole>(
            r#"
            SELECT h.hole_id, h.course_id, h.number, h.par, h.stroke_index,
                   h.distance_yards, h.distance_meters
            FROM holes h
            JOIN courses c ON h.course_id = c.course_id
            WHERE c.round_id = $1
            ORDER BY h.number
            "#,
        )
        .bind(round_id)
        .fetch_all(self.pool)
        .await?;

        Ok(holes)
    }

    /// Find a hole, only if it belongs to the given round
    pub async fn find_round_hole(&self, round_id: Uuid, hole_id: Uuid) -> Result<Hole> {
        let hole = sqlx::query_as::<_, Hole>(
            r#"
            SELECT h.hole_id, h.course_id, h.number, h.par, h.stroke_index,
                   h.distance_yards, h.distance_meters
            FROM holes h
            JOIN courses c ON h.course_id = c.course_id
            WHERE c.round_id = $1 AND h.hole_id = $2
            "#,
        )
        .bind(round_id)
        .bind(hole_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(hole)
    }
}
