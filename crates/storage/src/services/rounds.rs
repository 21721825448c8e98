use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use crate::dto::catalog::{CatalogCourse, CatalogMarker};
use crate::dto::common::ListResponse;
use crate::dto::round::{CreateRoundRequest, HoleResponse, RoundResponse, RoundSummaryResponse};
use crate::dto::user::{CreateUserRequest, UserResponse};
use crate::error::{StatsError, StatsResult, StorageError};
use crate::models::{NewRound, Round};
use crate::services::credentials::hash_password;
use crate::services::recompute::RecomputeScheduler;
use crate::store::{AggregateStore, RoundStore};

/// Source of course layouts for new rounds.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn fetch_course(&self, course_id: i64) -> StatsResult<CatalogCourse>;

    /// Courses whose name matches; every course when `name` is `None`.
    async fn search_courses(&self, name: Option<&str>) -> StatsResult<Vec<CatalogCourse>>;

    /// Markers of a course without their hole layouts, ordered by slope
    /// then rating.
    async fn list_markers(&self, course_id: i64) -> StatsResult<Vec<CatalogMarker>> {
        let course = self.fetch_course(course_id).await?;

        let mut markers = course.details;
        for marker in &mut markers {
            marker.holes.clear();
        }
        markers.sort_by(|a, b| a.slope.cmp(&b.slope).then(a.rating.cmp(&b.rating)));

        Ok(markers)
    }
}

pub async fn create_user<S>(store: &S, request: CreateUserRequest) -> StatsResult<UserResponse>
where
    S: RoundStore + ?Sized,
{
    request.validate()?;

    let password_hash = hash_password(&request.password)?;
    let user = store
        .create_user(&request.username, &password_hash)
        .await?;
    tracing::info!(user_id = %user.user_id, "Created user");

    Ok(user.into())
}

/// Creates a round with a snapshot of the catalog course for the chosen marker.
pub async fn create_round<S, C>(
    store: &S,
    catalog: &C,
    player_id: Uuid,
    request: CreateRoundRequest,
) -> StatsResult<RoundResponse>
where
    S: RoundStore + ?Sized,
    C: CourseCatalog + ?Sized,
{
    request.validate()?;

    let catalog_course = catalog.fetch_course(request.course_id).await?;
    let course = catalog_course.for_marker(request.marker_id).ok_or_else(|| {
        StatsError::InvalidRequest(format!(
            "course {} has no marker {}",
            request.course_id, request.marker_id
        ))
    })?;

    let round = store
        .create_round(&NewRound {
            player_id,
            tee_time: request.tee_time,
            course,
        })
        .await?;
    tracing::info!(round_id = %round.round_id, %player_id, "Created round");

    Ok(store.get_round_overview(round.round_id).await?.into())
}

pub async fn list_rounds<S>(store: &S, player_id: Uuid) -> StatsResult<ListResponse<RoundResponse>>
where
    S: RoundStore + ?Sized,
{
    let rounds = store.list_player_rounds(player_id).await?;
    Ok(rounds
        .into_iter()
        .map(RoundResponse::from)
        .collect::<Vec<_>>()
        .into())
}

/// Loads a round, failing with `Forbidden` when another player owns it.
pub async fn authorize_round<S>(store: &S, player_id: Uuid, round_id: Uuid) -> StatsResult<Round>
where
    S: RoundStore + ?Sized,
{
    let round = store.get_round(round_id).await?;
    if round.player_id != player_id {
        tracing::warn!(%round_id, %player_id, "Round access denied");
        return Err(StatsError::Forbidden);
    }

    Ok(round)
}

pub async fn list_round_holes<S>(
    store: &S,
    player_id: Uuid,
    round_id: Uuid,
) -> StatsResult<ListResponse<HoleResponse>>
where
    S: RoundStore + ?Sized,
{
    authorize_round(store, player_id, round_id).await?;

    let holes = store.list_round_holes(round_id).await?;
    Ok(holes
        .into_iter()
        .map(HoleResponse::from)
        .collect::<Vec<_>>()
        .into())
}

pub async fn get_round_summary<S>(
    store: &S,
    player_id: Uuid,
    round_id: Uuid,
) -> StatsResult<RoundSummaryResponse>
where
    S: RoundStore + AggregateStore + ?Sized,
{
    authorize_round(store, player_id, round_id).await?;

    let summary = store
        .find_round_summary(round_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    let breakdowns = store.list_breakdowns(summary.round_summary_id).await?;

    Ok(RoundSummaryResponse {
        summary,
        breakdowns,
    })
}

/// Schedules a recompute of a round owned by the player.
pub async fn request_recompute<S, R>(
    store: &S,
    scheduler: &R,
    player_id: Uuid,
    round_id: Uuid,
) -> StatsResult<()>
where
    S: RoundStore + ?Sized,
    R: RecomputeScheduler + ?Sized,
{
    authorize_round(store, player_id, round_id).await?;
    scheduler.schedule(round_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;

    use super::*;
    use crate::dto::catalog::{CatalogHole, CatalogMarker};
    use crate::services::credentials::verify_password;
    use crate::services::fixtures;
    use crate::services::recompute::recompute_round;
    use crate::store::MemoryStore;

    struct StaticCatalog(CatalogCourse);

    #[async_trait]
    impl CourseCatalog for StaticCatalog {
        async fn fetch_course(&self, course_id: i64) -> StatsResult<CatalogCourse> {
            if course_id == self.0.id {
                Ok(self.0.clone())
            } else {
                Err(StatsError::Catalog(format!("course {} not found", course_id)))
            }
        }

        async fn search_courses(&self, name: Option<&str>) -> StatsResult<Vec<CatalogCourse>> {
            let matches = name.is_none_or(|name| {
                self.0.name.to_lowercase().contains(&name.to_lowercase())
            });
            Ok(if matches { vec![self.0.clone()] } else { Vec::new() })
        }
    }

    #[derive(Default)]
    struct RecordingScheduler(Mutex<Vec<Uuid>>);

    impl RecomputeScheduler for RecordingScheduler {
        fn schedule(&self, round_id: Uuid) {
            self.0.lock().unwrap().push(round_id);
        }
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog(CatalogCourse {
            id: 42,
            name: "Links at Dunmore".to_string(),
            details: vec![marker(9, "white", 131, 735), CatalogMarker {
                id: 7,
                marker: "yellow".to_string(),
                slope: 131,
                rating: Decimal::new(722, 1),
                par_total: 7,
                yardage_total: 520,
                meters_total: 475,
                holes: vec![
                    CatalogHole {
                        number: 2,
                        par: 3,
                        stroke_index: 18,
                        yardage: 150,
                        meters: 137,
                    },
                    CatalogHole {
                        number: 1,
                        par: 4,
                        stroke_index: 5,
                        yardage: 370,
                        meters: 338,
                    },
                ],
            }],
        })
    }

    fn marker(id: i64, name: &str, slope: i32, rating: i64) -> CatalogMarker {
        CatalogMarker {
            id,
            marker: name.to_string(),
            slope,
            rating: Decimal::new(rating, 1),
            par_total: 4,
            yardage_total: 400,
            meters_total: 366,
            holes: vec![CatalogHole {
                number: 1,
                par: 4,
                stroke_index: 1,
                yardage: 400,
                meters: 366,
            }],
        }
    }

    fn request(course_id: i64, marker_id: i64) -> CreateRoundRequest {
        CreateRoundRequest {
            course_id,
            marker_id,
            tee_time: fixtures::tee_time("2024-06-01 09:30"),
        }
    }

    #[tokio::test]
    async fn test_create_round_from_catalog() {
        let store = MemoryStore::new();
        let player = fixtures::player(&store, "alice").await;

        let round = create_round(&store, &catalog(), player.user_id, request(42, 7))
            .await
            .unwrap();
        assert_eq!(round.course_name, "Links at Dunmore");
        assert_eq!(round.marker, "yellow");

        let holes = list_round_holes(&store, player.user_id, round.round_id)
            .await
            .unwrap();
        assert_eq!(holes.total, 2);
        assert_eq!(holes.items[0].number, 1);
        assert_eq!(holes.items[0].par, 4);
        assert_eq!(holes.items[1].yardage, 150);

        let rounds = list_rounds(&store, player.user_id).await.unwrap();
        assert_eq!(rounds.total, 1);
    }

    #[tokio::test]
    async fn test_create_round_unknown_marker() {
        let store = MemoryStore::new();
        let player = fixtures::player(&store, "alice").await;

        let result = create_round(&store, &catalog(), player.user_id, request(42, 8)).await;
        assert!(matches!(result, Err(StatsError::InvalidRequest(_))));

        let result = create_round(&store, &catalog(), player.user_id, request(41, 7)).await;
        assert!(matches!(result, Err(StatsError::Catalog(_))));

        let result = create_round(&store, &catalog(), player.user_id, request(0, 7)).await;
        assert!(matches!(result, Err(StatsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rounds_of_other_players_are_forbidden() {
        let store = MemoryStore::new();
        let alice = fixtures::player(&store, "alice").await;
        let bob = fixtures::player(&store, "bob").await;
        let round = fixtures::round(&store, &alice, "2024-05-01 08:00", &[4]).await;

        let result = list_round_holes(&store, bob.user_id, round.round_id).await;
        assert!(matches!(result, Err(StatsError::Forbidden)));

        let scheduler = RecordingScheduler::default();
        let result = request_recompute(&store, &scheduler, bob.user_id, round.round_id).await;
        assert!(matches!(result, Err(StatsError::Forbidden)));
        assert!(scheduler.0.lock().unwrap().is_empty());

        request_recompute(&store, &scheduler, alice.user_id, round.round_id)
            .await
            .unwrap();
        assert_eq!(*scheduler.0.lock().unwrap(), vec![round.round_id]);
    }

    #[tokio::test]
    async fn test_round_summary_requires_computation() {
        let store = MemoryStore::new();
        let player = fixtures::player(&store, "alice").await;
        let round = fixtures::round(&store, &player, "2024-05-01 08:00", &[4]).await;

        let result = get_round_summary(&store, player.user_id, round.round_id).await;
        assert!(matches!(
            result,
            Err(StatsError::Storage(StorageError::NotFound))
        ));

        recompute_round(&store, round.round_id).await.unwrap();
        let response = get_round_summary(&store, player.user_id, round.round_id)
            .await
            .unwrap();
        assert_eq!(response.summary.round_id, round.round_id);
        assert!(response.breakdowns.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = MemoryStore::new();
        let request = CreateUserRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
        };

        create_user(&store, request.clone()).await.unwrap();
        let result = create_user(&store, request).await;
        assert!(matches!(
            result,
            Err(StatsError::Storage(StorageError::ConstraintViolation(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_user_stores_password_hash() {
        let store = MemoryStore::new();
        let request = CreateUserRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
        };

        create_user(&store, request).await.unwrap();

        let stored = store.find_user_by_username("alice").await.unwrap();
        assert_ne!(stored.password, "password123");
        assert!(verify_password("password123", &stored.password));
    }

    #[tokio::test]
    async fn test_markers_sorted_without_holes() {
        let markers = catalog().list_markers(42).await.unwrap();

        let ids: Vec<i64> = markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![7, 9]);
        assert!(markers.iter().all(|m| m.holes.is_empty()));

        let result = catalog().list_markers(41).await;
        assert!(matches!(result, Err(StatsError::Catalog(_))));
    }
}
