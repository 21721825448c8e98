use uuid::Uuid;

use crate::dto::hole_stat::{HoleStatRequest, HoleStatResponse};
use crate::error::StatsResult;
use crate::models::HoleStatValues;
use crate::services::change_detection::{HoleStatChange, detect_change};
use crate::services::recompute::RecomputeScheduler;
use crate::services::rounds::authorize_round;
use crate::store::{HoleStatStore, RoundStore};

/// Returns the stored stat of a hole, or the zero value when none was
/// recorded yet. Nothing is persisted.
pub async fn get_hole_stat<S>(
    store: &S,
    player_id: Uuid,
    round_id: Uuid,
    hole_id: Uuid,
) -> StatsResult<HoleStatResponse>
where
    S: RoundStore + HoleStatStore + ?Sized,
{
    authorize_round(store, player_id, round_id).await?;
    let hole = store.get_round_hole(round_id, hole_id).await?;

    Ok(match store.find_hole_stat(hole.hole_id).await? {
        Some(stat) => stat.into(),
        None => HoleStatResponse {
            hole_id: hole.hole_id,
            values: HoleStatValues::default(),
        },
    })
}

/// Records a hole stat and schedules a recompute of the round when the
/// business values changed.
///
/// Invalid input is rejected before the store is touched. Submitting the
/// stored values again writes nothing and schedules nothing.
pub async fn submit_hole_stat<S, R>(
    store: &S,
    scheduler: &R,
    player_id: Uuid,
    round_id: Uuid,
    hole_id: Uuid,
    request: HoleStatRequest,
) -> StatsResult<HoleStatResponse>
where
    S: RoundStore + HoleStatStore + ?Sized,
    R: RecomputeScheduler + ?Sized,
{
    let candidate = HoleStatValues::try_from(request)?;

    authorize_round(store, player_id, round_id).await?;
    let hole = store.get_round_hole(round_id, hole_id).await?;
    let previous = store.find_hole_stat(hole.hole_id).await?;

    match detect_change(previous.as_ref(), candidate.clone()) {
        HoleStatChange::Unchanged => {
            tracing::debug!(%round_id, %hole_id, "Hole stat unchanged");
            return Ok(HoleStatResponse {
                hole_id: hole.hole_id,
                values: candidate,
            });
        }
        HoleStatChange::Insert(values) => {
            store.insert_hole_stat(hole.hole_id, &values).await?;
        }
        HoleStatChange::Update {
            hole_stat_id,
            values,
        } => {
            let rows = store.update_hole_stat(hole_stat_id, &values).await?;
            if rows == 0 {
                tracing::debug!(%hole_stat_id, "Hole stat update affected no rows");
            }
        }
    }

    scheduler.schedule(round_id);

    Ok(HoleStatResponse {
        hole_id: hole.hole_id,
        values: candidate,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::error::{StatsError, StorageError};
    use crate::models::HitOutcome;
    use crate::services::fixtures::{self, LaggingStore};
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct CountingScheduler(Mutex<Vec<Uuid>>);

    impl CountingScheduler {
        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    impl RecomputeScheduler for CountingScheduler {
        fn schedule(&self, round_id: Uuid) {
            self.0.lock().unwrap().push(round_id);
        }
    }

    fn request(green: HitOutcome) -> HoleStatRequest {
        HoleStatRequest {
            score: Some(4),
            putts: Some(2),
            penalties: Some(0),
            fairway_hit: Some(HitOutcome::Hit),
            green_hit: Some(green),
            pin_location: Some("back left".to_string()),
        }
    }

    async fn setup(store: &MemoryStore) -> (Uuid, Uuid, Uuid) {
        let player = fixtures::player(store, "alice").await;
        let round = fixtures::round(store, &player, "2024-05-01 08:00", &[4, 3]).await;
        let holes = store.list_round_holes(round.round_id).await.unwrap();
        (player.user_id, round.round_id, holes[0].hole_id)
    }

    #[tokio::test]
    async fn test_unrecorded_hole_reads_zero_value() {
        let store = MemoryStore::new();
        let (player, round, hole) = setup(&store).await;

        let response = get_hole_stat(&store, player, round, hole).await.unwrap();
        assert_eq!(response.hole_id, hole);
        assert_eq!(response.values, HoleStatValues::default());
        assert_eq!(store.hole_stat_writes(), 0);
    }

    #[tokio::test]
    async fn test_resubmission_is_idempotent() {
        let store = MemoryStore::new();
        let scheduler = CountingScheduler::default();
        let (player, round, hole) = setup(&store).await;

        submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Hit))
            .await
            .unwrap();
        submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Hit))
            .await
            .unwrap();

        assert_eq!(store.hole_stat_writes(), 1);
        assert_eq!(scheduler.count(), 1);

        let stored = get_hole_stat(&store, player, round, hole).await.unwrap();
        assert_eq!(stored.values.green_hit, HitOutcome::Hit);
    }

    #[tokio::test]
    async fn test_change_updates_same_record() {
        let store = MemoryStore::new();
        let scheduler = CountingScheduler::default();
        let (player, round, hole) = setup(&store).await;

        submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Hit))
            .await
            .unwrap();
        let first = store.find_hole_stat(hole).await.unwrap().unwrap();

        submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Long))
            .await
            .unwrap();
        let second = store.find_hole_stat(hole).await.unwrap().unwrap();

        assert_eq!(first.hole_stat_id, second.hole_stat_id);
        assert_eq!(second.values.green_hit, HitOutcome::Long);
        assert_eq!(store.hole_stat_writes(), 2);
        assert_eq!(scheduler.count(), 2);
    }

    #[tokio::test]
    async fn test_green_not_applicable_rejected_without_writes() {
        let store = MemoryStore::new();
        let scheduler = CountingScheduler::default();
        let (player, round, hole) = setup(&store).await;

        let result = submit_hole_stat(
            &store,
            &scheduler,
            player,
            round,
            hole,
            request(HitOutcome::NotApplicable),
        )
        .await;

        assert!(matches!(result, Err(StatsError::Validation(_))));
        assert_eq!(store.hole_stat_writes(), 0);
        assert_eq!(scheduler.count(), 0);
    }

    #[tokio::test]
    async fn test_hole_from_another_round_not_found() {
        let store = MemoryStore::new();
        let scheduler = CountingScheduler::default();
        let (player, round, _) = setup(&store).await;
        let owner = store.find_user_by_username("alice").await.unwrap();
        let other = fixtures::round(&store, &owner, "2024-05-02 08:00", &[4]).await;
        let foreign_hole = store.list_round_holes(other.round_id).await.unwrap()[0].hole_id;

        let result = submit_hole_stat(
            &store,
            &scheduler,
            player,
            round,
            foreign_hole,
            request(HitOutcome::Hit),
        )
        .await;

        assert!(matches!(
            result,
            Err(StatsError::Storage(StorageError::NotFound))
        ));
        assert_eq!(scheduler.count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_submissions_both_succeed() {
        let store = LaggingStore::with_read_delay(Duration::from_millis(20));
        let scheduler = CountingScheduler::default();
        let (player, round, hole) = setup(&store.inner).await;

        let (first, second) = tokio::join!(
            submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Hit)),
            submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Left)),
        );
        first.unwrap();
        second.unwrap();

        let performances = store.list_round_performances(round).await.unwrap();
        assert_eq!(performances.len(), 1);
        assert!(matches!(
            performances[0].values.green_hit,
            HitOutcome::Hit | HitOutcome::Left
        ));
        assert_eq!(store.inner.hole_stat_writes(), 2);
        assert_eq!(scheduler.count(), 2);
    }

    #[tokio::test]
    async fn test_update_of_vanished_row_still_schedules() {
        let store = LaggingStore::with_stale_updates();
        let scheduler = CountingScheduler::default();
        let (player, round, hole) = setup(&store.inner).await;

        submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Hit))
            .await
            .unwrap();
        let response =
            submit_hole_stat(&store, &scheduler, player, round, hole, request(HitOutcome::Short))
                .await
                .unwrap();

        assert_eq!(response.values.green_hit, HitOutcome::Short);
        assert_eq!(scheduler.count(), 2);
        assert_eq!(scheduler.0.lock().unwrap()[1], round);
    }
}
