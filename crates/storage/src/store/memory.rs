use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AggregateStore, HoleStatStore, RoundStore};
use crate::error::{Result, StorageError};
use crate::models::{
    BreakdownKind, BreakdownRow, CategoricalBreakdown, Course, Hole, HolePerformance, HoleStat,
    HoleStatValues, NewRound, Round, RoundOverview, RoundSummary, RoundWithSummary, SummaryValues,
    User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    rounds: HashMap<Uuid, Round>,
    courses: HashMap<Uuid, Course>,
    holes: HashMap<Uuid, Hole>,
    hole_stats: HashMap<Uuid, HoleStat>,
    summaries: HashMap<Uuid, RoundSummary>,
    breakdowns: HashMap<Uuid, CategoricalBreakdown>,
}

impl Tables {
    fn course_of_round(&self, round_id: Uuid) -> Option<&Course> {
        self.courses.values().find(|c| c.round_id == round_id)
    }

    fn overview(&self, round: &Round) -> Option<RoundOverview> {
        let course = self.course_of_round(round.round_id)?;

        Some(RoundOverview {
            round_id: round.round_id,
            tee_time: round.tee_time,
            course_name: course.name.clone(),
            marker: course.marker.clone(),
        })
    }

    fn round_holes(&self, round_id: Uuid) -> Vec<Hole> {
        let Some(course) = self.course_of_round(round_id) else {
            return Vec::new();
        };

        let mut holes: Vec<Hole> = self
            .holes
            .values()
            .filter(|h| h.course_id == course.course_id)
            .cloned()
            .collect();
        holes.sort_by_key(|h| h.number);
        holes
    }

    fn summary_of_round(&self, round_id: Uuid) -> Option<&RoundSummary> {
        self.summaries.values().find(|s| s.round_id == round_id)
    }
}

/// In-process store with the same uniqueness rules as the Postgres schema.
///
/// Used by the test suites and for running the service without a database.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    hole_stat_writes: AtomicU64,
    summary_writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hole stat inserts and updates issued so far.
    pub fn hole_stat_writes(&self) -> u64 {
        self.hole_stat_writes.load(Ordering::SeqCst)
    }

    /// Number of round summary inserts and updates issued so far.
    pub fn summary_writes(&self) -> u64 {
        self.summary_writes.load(Ordering::SeqCst)
    }

    /// Number of summary rows stored for a round.
    pub async fn summary_count(&self, round_id: Uuid) -> usize {
        let tables = self.tables.read().await;
        tables
            .summaries
            .values()
            .filter(|s| s.round_id == round_id)
            .count()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl RoundStore for MemoryStore {
    async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == username) {
            return Err(StorageError::ConstraintViolation(format!(
                "username '{}' already exists",
                username
            )));
        }

        let user = User {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            password: password.to_string(),
            created_at: now(),
        };
        tables.users.insert(user.user_id, user.clone());

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create_round(&self, new_round: &NewRound) -> Result<Round> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_round.player_id) {
            return Err(StorageError::ConstraintViolation(
                "round player does not exist".to_string(),
            ));
        }

        let round = Round {
            round_id: Uuid::new_v4(),
            player_id: new_round.player_id,
            tee_time: new_round.tee_time,
            created_at: now(),
        };

        let new_course = &new_round.course;
        let course = Course {
            course_id: Uuid::new_v4(),
            round_id: round.round_id,
            name: new_course.name.clone(),
            marker: new_course.marker.clone(),
            slope: new_course.slope,
            rating: new_course.rating,
            total_par: new_course.total_par,
            total_yards: new_course.total_yards,
            total_meters: new_course.total_meters,
        };

        for new_hole in &new_course.holes {
            let hole = Hole {
                hole_id: Uuid::new_v4(),
                course_id: course.course_id,
                number: new_hole.number,
                par: new_hole.par,
                stroke_index: new_hole.stroke_index,
                distance_yards: new_hole.distance_yards,
                distance_meters: new_hole.distance_meters,
            };
            tables.holes.insert(hole.hole_id, hole);
        }

        tables.courses.insert(course.course_id, course);
        tables.rounds.insert(round.round_id, round.clone());

        Ok(round)
    }

    async fn get_round(&self, round_id: Uuid) -> Result<Round> {
        let tables = self.tables.read().await;
        tables
            .rounds
            .get(&round_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn get_round_overview(&self, round_id: Uuid) -> Result<RoundOverview> {
        let tables = self.tables.read().await;
        tables
            .rounds
            .get(&round_id)
            .and_then(|round| tables.overview(round))
            .ok_or(StorageError::NotFound)
    }

    async fn list_player_rounds(&self, player_id: Uuid) -> Result<Vec<RoundOverview>> {
        let tables = self.tables.read().await;

        let mut rounds: Vec<RoundOverview> = tables
            .rounds
            .values()
            .filter(|r| r.player_id == player_id)
            .filter_map(|r| tables.overview(r))
            .collect();
        rounds.sort_by(|a, b| b.tee_time.cmp(&a.tee_time));

        Ok(rounds)
    }

    async fn list_round_holes(&self, round_id: Uuid) -> Result<Vec<Hole>> {
        let tables = self.tables.read().await;
        Ok(tables.round_holes(round_id))
    }

    async fn get_round_hole(&self, round_id: Uuid, hole_id: Uuid) -> Result<Hole> {
        let tables = self.tables.read().await;
        let course = tables
            .course_of_round(round_id)
            .ok_or(StorageError::NotFound)?;

        tables
            .holes
            .get(&hole_id)
            .filter(|h| h.course_id == course.course_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl HoleStatStore for MemoryStore {
    async fn find_hole_stat(&self, hole_id: Uuid) -> Result<Option<HoleStat>> {
        let tables = self.tables.read().await;
        Ok(tables
            .hole_stats
            .values()
            .find(|s| s.hole_id == hole_id)
            .cloned())
    }

    async fn insert_hole_stat(&self, hole_id: Uuid, values: &HoleStatValues) -> Result<Uuid> {
        let mut tables = self.tables.write().await;
        self.hole_stat_writes.fetch_add(1, Ordering::SeqCst);

        if !tables.holes.contains_key(&hole_id) {
            return Err(StorageError::ConstraintViolation(
                "hole does not exist".to_string(),
            ));
        }

        // ON CONFLICT (hole_id) DO UPDATE
        let hole_stat_id = tables
            .hole_stats
            .values()
            .find(|s| s.hole_id == hole_id)
            .map(|s| s.hole_stat_id)
            .unwrap_or_else(Uuid::new_v4);

        let stat = HoleStat {
            hole_stat_id,
            hole_id,
            values: values.clone(),
            updated_at: now(),
        };
        tables.hole_stats.insert(hole_stat_id, stat);

        Ok(hole_stat_id)
    }

    async fn update_hole_stat(&self, hole_stat_id: Uuid, values: &HoleStatValues) -> Result<u64> {
        let mut tables = self.tables.write().await;
        self.hole_stat_writes.fetch_add(1, Ordering::SeqCst);

        match tables.hole_stats.get_mut(&hole_stat_id) {
            Some(stat) => {
                stat.values = values.clone();
                stat.updated_at = now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_round_performances(&self, round_id: Uuid) -> Result<Vec<HolePerformance>> {
        let tables = self.tables.read().await;

        let performances = tables
            .round_holes(round_id)
            .into_iter()
            .filter_map(|hole| {
                tables
                    .hole_stats
                    .values()
                    .find(|s| s.hole_id == hole.hole_id)
                    .map(|stat| HolePerformance {
                        hole_id: hole.hole_id,
                        par: hole.par,
                        values: stat.values.clone(),
                    })
            })
            .collect();

        Ok(performances)
    }
}

#[async_trait]
impl AggregateStore for MemoryStore {
    async fn find_round_summary(&self, round_id: Uuid) -> Result<Option<RoundSummary>> {
        let tables = self.tables.read().await;
        Ok(tables.summary_of_round(round_id).cloned())
    }

    async fn insert_round_summary(
        &self,
        round_id: Uuid,
        values: &SummaryValues,
    ) -> Result<RoundSummary> {
        let mut tables = self.tables.write().await;
        self.summary_writes.fetch_add(1, Ordering::SeqCst);

        if !tables.rounds.contains_key(&round_id) {
            return Err(StorageError::ConstraintViolation(
                "round does not exist".to_string(),
            ));
        }

        // ON CONFLICT (round_id) DO UPDATE
        let round_summary_id = tables
            .summary_of_round(round_id)
            .map(|s| s.round_summary_id)
            .unwrap_or_else(Uuid::new_v4);

        let summary = RoundSummary {
            round_summary_id,
            round_id,
            values: values.clone(),
            computed_at: now(),
        };
        tables.summaries.insert(round_summary_id, summary.clone());

        Ok(summary)
    }

    async fn update_round_summary(
        &self,
        round_summary_id: Uuid,
        values: &SummaryValues,
    ) -> Result<u64> {
        let mut tables = self.tables.write().await;
        self.summary_writes.fetch_add(1, Ordering::SeqCst);

        match tables.summaries.get_mut(&round_summary_id) {
            Some(summary) => {
                summary.values = values.clone();
                summary.computed_at = now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_breakdowns(&self, round_summary_id: Uuid) -> Result<Vec<CategoricalBreakdown>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<CategoricalBreakdown> = tables
            .breakdowns
            .values()
            .filter(|b| b.round_summary_id == round_summary_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.kind, b.bucket));

        Ok(rows)
    }

    async fn save_breakdowns(&self, rows: &[BreakdownRow]) -> Result<()> {
        let mut tables = self.tables.write().await;

        for row in rows {
            if let Some(breakdown_id) = row.breakdown_id {
                if let Some(existing) = tables.breakdowns.get_mut(&breakdown_id) {
                    existing.count = row.count;
                }
                continue;
            }

            // ON CONFLICT (round_summary_id, kind, bucket) DO UPDATE
            let conflicting = tables
                .breakdowns
                .values()
                .find(|b| {
                    b.round_summary_id == row.round_summary_id
                        && b.kind == row.kind
                        && b.bucket == row.bucket
                })
                .map(|b| b.breakdown_id);

            match conflicting.and_then(|id| tables.breakdowns.get_mut(&id)) {
                Some(existing) => existing.count = row.count,
                None => {
                    let breakdown = CategoricalBreakdown {
                        breakdown_id: Uuid::new_v4(),
                        round_summary_id: row.round_summary_id,
                        kind: row.kind,
                        bucket: row.bucket,
                        count: row.count,
                    };
                    tables.breakdowns.insert(breakdown.breakdown_id, breakdown);
                }
            }
        }

        Ok(())
    }

    async fn list_player_summaries(&self, player_id: Uuid) -> Result<Vec<RoundWithSummary>> {
        let tables = self.tables.read().await;

        let mut rounds: Vec<RoundWithSummary> = tables
            .rounds
            .values()
            .filter(|r| r.player_id == player_id)
            .filter_map(|round| {
                let course = tables.course_of_round(round.round_id)?;
                let summary = tables.summary_of_round(round.round_id)?;

                Some(RoundWithSummary {
                    round_id: round.round_id,
                    tee_time: round.tee_time,
                    course_name: course.name.clone(),
                    summary: summary.values.clone(),
                })
            })
            .collect();
        rounds.sort_by_key(|r| r.tee_time);

        Ok(rounds)
    }

    async fn list_player_breakdowns(
        &self,
        player_id: Uuid,
        kind: BreakdownKind,
    ) -> Result<Vec<CategoricalBreakdown>> {
        let tables = self.tables.read().await;

        let rows = tables
            .breakdowns
            .values()
            .filter(|b| b.kind == kind)
            .filter(|b| {
                tables
                    .summaries
                    .get(&b.round_summary_id)
                    .and_then(|s| tables.rounds.get(&s.round_id))
                    .is_some_and(|r| r.player_id == player_id)
            })
            .cloned()
            .collect();

        Ok(rows)
    }
}
