use async_trait::async_trait;
use uuid::Uuid;

use super::{AggregateStore, HoleStatStore, RoundStore};
use crate::Database;
use crate::error::Result;
use crate::models::{
    BreakdownKind, BreakdownRow, CategoricalBreakdown, Hole, HolePerformance, HoleStat,
    HoleStatValues, NewRound, Round, RoundOverview, RoundSummary, RoundWithSummary, SummaryValues,
    User,
};
use crate::repository::{
    breakdown::BreakdownRepository, hole_stat::HoleStatRepository, round::RoundRepository,
    summary::SummaryRepository, user::UserRepository,
};

#[async_trait]
impl RoundStore for Database {
    async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        UserRepository::new(self.pool()).create(username, password).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User> {
        UserRepository::new(self.pool()).find_by_username(username).await
    }

    async fn create_round(&self, new_round: &NewRound) -> Result<Round> {
        RoundRepository::new(self.pool()).create_with_course(new_round).await
    }

    async fn get_round(&self, round_id: Uuid) -> Result<Round> {
        RoundRepository::new(self.pool()).find_by_id(round_id).await
    }

    async fn get_round_overview(&self, round_id: Uuid) -> Result<RoundOverview> {
        RoundRepository::new(self.pool()).find_overview(round_id).await
    }

    async fn list_player_rounds(&self, player_id: Uuid) -> Result<Vec<RoundOverview>> {
        RoundRepository::new(self.pool()).list_for_player(player_id).await
    }

    async fn list_round_holes(&self, round_id: Uuid) -> Result<Vec<Hole>> {
        RoundRepository::new(self.pool()).list_holes(round_id).await
    }

    async fn get_round_hole(&self, round_id: Uuid, hole_id: Uuid) -> Result<Hole> {
        RoundRepository::new(self.pool())
            .find_round_hole(round_id, hole_id)
            .await
    }
}

#[async_trait]
impl HoleStatStore for Database {
    async fn find_hole_stat(&self, hole_id: Uuid) -> Result<Option<HoleStat>> {
        HoleStatRepository::new(self.pool()).find_by_hole_id(hole_id).await
    }

    async fn insert_hole_stat(&self, hole_id: Uuid, values: &HoleStatValues) -> Result<Uuid> {
        HoleStatRepository::new(self.pool()).insert(hole_id, values).await
    }

    async fn update_hole_stat(&self, hole_stat_id: Uuid, values: &HoleStatValues) -> Result<u64> {
        HoleStatRepository::new(self.pool())
            .update(hole_stat_id, values)
            .await
    }

    async fn list_round_performances(&self, round_id: Uuid) -> Result<Vec<HolePerformance>> {
        HoleStatRepository::new(self.pool())
            .list_performances_for_round(round_id)
            .await
    }
}

#[async_trait]
impl AggregateStore for Database {
    async fn find_round_summary(&self, round_id: Uuid) -> Result<Option<RoundSummary>> {
        SummaryRepository::new(self.pool()).find_by_round_id(round_id).await
    }

    async fn insert_round_summary(
        &self,
        round_id: Uuid,
        values: &SummaryValues,
    ) -> Result<RoundSummary> {
        SummaryRepository::new(self.pool()).insert(round_id, values).await
    }

    async fn update_round_summary(
        &self,
        round_summary_id: Uuid,
        values: &SummaryValues,
    ) -> Result<u64> {
        SummaryRepository::new(self.pool())
            .update(round_summary_id, values)
            .await
    }

    async fn list_breakdowns(&self, round_summary_id: Uuid) -> Result<Vec<CategoricalBreakdown>> {
        BreakdownRepository::new(self.pool())
            .list_for_summary(round_summary_id)
            .await
    }

    async fn save_breakdowns(&self, rows: &[BreakdownRow]) -> Result<()> {
        BreakdownRepository::new(self.pool()).save_many(rows).await
    }

    async fn list_player_summaries(&self, player_id: Uuid) -> Result<Vec<RoundWithSummary>> {
        SummaryRepository::new(self.pool()).list_for_player(player_id).await
    }

    async fn list_player_breakdowns(
        &self,
        player_id: Uuid,
        kind: BreakdownKind,
    ) -> Result<Vec<CategoricalBreakdown>> {
        BreakdownRepository::new(self.pool())
            .list_for_player(player_id, kind)
            .await
    }
}
