//! Storage seams used by the statistics services.
//!
//! [`Database`](crate::Database) implements them over Postgres and
//! [`MemoryStore`] keeps everything in process.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    BreakdownKind, BreakdownRow, CategoricalBreakdown, Hole, HolePerformance, HoleStat,
    HoleStatValues, NewRound, Round, RoundOverview, RoundSummary, RoundWithSummary, SummaryValues,
    User,
};

mod memory;
mod postgres;

pub use memory::MemoryStore;

/// Users, rounds and their course reference data.
#[async_trait]
pub trait RoundStore: Send + Sync {
    async fn create_user(&self, username: &str, password: &str) -> Result<User>;

    async fn find_user_by_username(&self, username: &str) -> Result<User>;

    async fn create_round(&self, new_round: &NewRound) -> Result<Round>;

    async fn get_round(&self, round_id: Uuid) -> Result<Round>;

    async fn get_round_overview(&self, round_id: Uuid) -> Result<RoundOverview>;

    async fn list_player_rounds(&self, player_id: Uuid) -> Result<Vec<RoundOverview>>;

    async fn list_round_holes(&self, round_id: Uuid) -> Result<Vec<Hole>>;

    /// `NotFound` unless the hole belongs to the round.
    async fn get_round_hole(&self, round_id: Uuid, hole_id: Uuid) -> Result<Hole>;
}

/// Mutable per-hole records.
#[async_trait]
pub trait HoleStatStore: Send + Sync {
    async fn find_hole_stat(&self, hole_id: Uuid) -> Result<Option<HoleStat>>;

    /// Replaces the values when the hole already has a stat.
    async fn insert_hole_stat(&self, hole_id: Uuid, values: &HoleStatValues) -> Result<Uuid>;

    /// Returns the number of rows affected.
    async fn update_hole_stat(&self, hole_stat_id: Uuid, values: &HoleStatValues) -> Result<u64>;

    async fn list_round_performances(&self, round_id: Uuid) -> Result<Vec<HolePerformance>>;
}

/// Materialized round summaries and categorical breakdowns.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn find_round_summary(&self, round_id: Uuid) -> Result<Option<RoundSummary>>;

    async fn insert_round_summary(
        &self,
        round_id: Uuid,
        values: &SummaryValues,
    ) -> Result<RoundSummary>;

    /// Returns the number of rows affected.
    async fn update_round_summary(
        &self,
        round_summary_id: Uuid,
        values: &SummaryValues,
    ) -> Result<u64>;

    async fn list_breakdowns(&self, round_summary_id: Uuid) -> Result<Vec<CategoricalBreakdown>>;

    async fn save_breakdowns(&self, rows: &[BreakdownRow]) -> Result<()>;

    /// Summarized rounds of a player ordered by tee time.
    async fn list_player_summaries(&self, player_id: Uuid) -> Result<Vec<RoundWithSummary>>;

    async fn list_player_breakdowns(
        &self,
        player_id: Uuid,
        kind: BreakdownKind,
    ) -> Result<Vec<CategoricalBreakdown>>;
}

/// Everything the services need from storage.
pub trait Store: RoundStore + HoleStatStore + AggregateStore {}

impl<T: RoundStore + HoleStatStore + AggregateStore + ?Sized> Store for T {}
