//! Round summary recomputation.
//!
//! Hole stat writes schedule a recompute of their round. Requests for a round
//! that is already waiting in the queue are collapsed, and recomputes of the
//! same round never overlap, so a slower stale computation can't overwrite a
//! newer one.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use tokio::sync::{OwnedMutexGuard, Semaphore, mpsc, watch};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::RoundSummary;
use crate::services::breakdown_reconciliation::reconcile_breakdowns;
use crate::services::round_aggregation::{summarize_round, upsert_round_summary};
use crate::store::Store;

/// Recomputes the summary and breakdowns of a round from one read of its
/// hole stats.
pub async fn recompute_round<S>(store: &S, round_id: Uuid) -> Result<RoundSummary>
where
    S: Store + ?Sized,
{
    store.get_round(round_id).await?;

    let performances = store.list_round_performances(round_id).await?;
    let summary = upsert_round_summary(store, round_id, summarize_round(&performances)).await?;
    reconcile_breakdowns(store, &summary, &performances).await?;

    Ok(summary)
}

/// One async mutex per round, dropped once nobody holds or waits on it.
#[derive(Default)]
pub struct RoundLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl RoundLocks {
    pub async fn acquire(&self, round_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(round_id).or_default().clone()
        };

        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accepts recompute requests without waiting for them to run.
pub trait RecomputeScheduler: Send + Sync {
    fn schedule(&self, round_id: Uuid);
}

#[derive(Debug, Clone)]
pub struct RecomputeConfig {
    /// Recomputes running at the same time, across rounds.
    pub workers: usize,
    pub queue_capacity: usize,
    pub max_attempts: u32,
    /// Multiplied by the attempt number between retries.
    pub retry_backoff: Duration,
}

impl Default for RecomputeConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// A recompute that was given up on.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub round_id: Uuid,
    pub attempts: u32,
    pub error: String,
    pub failed_at: NaiveDateTime,
}

struct Shared {
    pending: Mutex<HashSet<Uuid>>,
    dead_letters: Mutex<Vec<DeadLetter>>,
    outstanding: watch::Sender<usize>,
}

impl Shared {
    fn take_pending(&self, round_id: Uuid) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&round_id);
    }

    fn dead_letter(&self, round_id: Uuid, attempts: u32, error: String) {
        tracing::error!(%round_id, attempts, %error, "Round recompute failed");

        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DeadLetter {
                round_id,
                attempts,
                error,
                failed_at: Utc::now().naive_utc(),
            });
    }

    fn finish(&self) {
        self.outstanding.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Bounded background queue of round recomputes.
#[derive(Clone)]
pub struct RecomputeQueue {
    sender: mpsc::Sender<Uuid>,
    shared: Arc<Shared>,
}

impl RecomputeQueue {
    /// Starts the dispatcher on the current tokio runtime.
    pub fn spawn<S>(store: Arc<S>, config: RecomputeConfig) -> Self
    where
        S: Store + ?Sized + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let (outstanding, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            pending: Mutex::new(HashSet::new()),
            dead_letters: Mutex::new(Vec::new()),
            outstanding,
        });

        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Starting recompute queue"
        );
        tokio::spawn(dispatch(store, receiver, shared.clone(), config));

        Self { sender, shared }
    }

    /// Resolves once every accepted request has finished, successfully or not.
    pub async fn wait_idle(&self) {
        let mut outstanding = self.shared.outstanding.subscribe();
        // The sender lives in `shared`, so the channel can't close here.
        let _ = outstanding.wait_for(|n| *n == 0).await;
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.shared
            .dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecomputeScheduler for RecomputeQueue {
    fn schedule(&self, round_id: Uuid) {
        {
            let mut pending = self
                .shared
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !pending.insert(round_id) {
                tracing::debug!(%round_id, "Recompute already pending");
                return;
            }
        }

        self.shared.outstanding.send_modify(|n| *n += 1);

        if let Err(e) = self.sender.try_send(round_id) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "recompute queue is full",
                mpsc::error::TrySendError::Closed(_) => "recompute queue is closed",
            };
            self.shared.take_pending(round_id);
            self.shared.dead_letter(round_id, 0, reason.to_string());
            self.shared.finish();
        }
    }
}

async fn dispatch<S>(
    store: Arc<S>,
    mut receiver: mpsc::Receiver<Uuid>,
    shared: Arc<Shared>,
    config: RecomputeConfig,
) where
    S: Store + ?Sized + 'static,
{
    let workers = Arc::new(Semaphore::new(config.workers.max(1)));
    let locks = Arc::new(RoundLocks::default());

    while let Some(round_id) = receiver.recv().await {
        let Ok(permit) = workers.clone().acquire_owned().await else {
            break;
        };

        let store = store.clone();
        let shared = shared.clone();
        let locks = locks.clone();
        let config = config.clone();

        tokio::spawn(async move {
            shared.take_pending(round_id);

            if let Err((attempts, error)) = run_with_retries(&*store, &locks, round_id, &config).await
            {
                shared.dead_letter(round_id, attempts, error.to_string());
            }

            drop(permit);
            shared.finish();
        });
    }

    tracing::info!("Recompute queue stopped");
}

async fn run_with_retries<S>(
    store: &S,
    locks: &RoundLocks,
    round_id: Uuid,
    config: &RecomputeConfig,
) -> std::result::Result<(), (u32, StorageError)>
where
    S: Store + ?Sized,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = {
            let _guard = locks.acquire(round_id).await;
            recompute_round(store, round_id).await
        };

        match result {
            Ok(summary) => {
                tracing::debug!(
                    %round_id,
                    round_summary_id = %summary.round_summary_id,
                    attempt,
                    "Round recomputed"
                );
                return Ok(());
            }
            Err(StorageError::NotFound) => return Err((attempt, StorageError::NotFound)),
            Err(e) if attempt < config.max_attempts => {
                tracing::warn!(%round_id, attempt, error = %e, "Round recompute failed, retrying");
                tokio::time::sleep(config.retry_backoff * attempt).await;
            }
            Err(e) => return Err((attempt, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;
    use crate::models::HitOutcome;
    use crate::services::fixtures;
    use crate::store::{AggregateStore, HoleStatStore, MemoryStore, RoundStore};

    async fn played_round(store: &MemoryStore) -> Uuid {
        let player = fixtures::player(store, "alice").await;
        let round = fixtures::round(store, &player, "2024-05-01 08:00", &[4, 4, 5]).await;
        let holes = store.list_round_holes(round.round_id).await.unwrap();

        let stats = [
            fixtures::stat(4, 2, HitOutcome::Hit, HitOutcome::Hit),
            crate::models::HoleStatValues {
                penalties: 1,
                ..fixtures::stat(5, 2, HitOutcome::Left, HitOutcome::Left)
            },
            fixtures::stat(5, 1, HitOutcome::NotApplicable, HitOutcome::Hit),
        ];
        for (hole, stat) in holes.iter().zip(stats.iter()) {
            store.insert_hole_stat(hole.hole_id, stat).await.unwrap();
        }

        round.round_id
    }

    fn config() -> RecomputeConfig {
        RecomputeConfig {
            retry_backoff: Duration::from_millis(1),
            ..RecomputeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_recompute_round() {
        let store = MemoryStore::new();
        let round_id = played_round(&store).await;

        let summary = recompute_round(&store, round_id).await.unwrap();

        assert_eq!(summary.values.avg_putts, Some(Decimal::from_str("1.67").unwrap()));
        assert_eq!(summary.values.fairway_hit_pct, Some(Decimal::from(50)));
        assert_eq!(summary.values.green_hit_pct, Some(Decimal::from_str("66.67").unwrap()));
        assert_eq!(summary.values.penalties, 1);
        assert_eq!(summary.values.avg_par3, None);

        let breakdowns = store.list_breakdowns(summary.round_summary_id).await.unwrap();
        assert_eq!(breakdowns.len(), 5);
    }

    #[tokio::test]
    async fn test_recompute_keeps_summary_identity() {
        let store = MemoryStore::new();
        let round_id = played_round(&store).await;

        let first = recompute_round(&store, round_id).await.unwrap();
        let first_breakdowns = store.list_breakdowns(first.round_summary_id).await.unwrap();
        let second = recompute_round(&store, round_id).await.unwrap();
        let second_breakdowns = store.list_breakdowns(second.round_summary_id).await.unwrap();

        assert_eq!(first.round_summary_id, second.round_summary_id);
        assert_eq!(first.values, second.values);
        assert_eq!(store.summary_count(round_id).await, 1);

        let ids = |rows: &[crate::models::CategoricalBreakdown]| -> HashSet<Uuid> {
            rows.iter().map(|b| b.breakdown_id).collect()
        };
        assert_eq!(ids(&first_breakdowns), ids(&second_breakdowns));
    }

    #[tokio::test]
    async fn test_recompute_unknown_round() {
        let store = MemoryStore::new();
        let result = recompute_round(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_round_locks_serialize_same_round() {
        let locks = RoundLocks::default();
        let round_id = Uuid::new_v4();

        let guard = locks.acquire(round_id).await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(20), locks.acquire(round_id)).await;
        assert!(blocked.is_err());

        let other = tokio::time::timeout(Duration::from_millis(20), locks.acquire(Uuid::new_v4()))
            .await;
        assert!(other.is_ok());
        drop(other);

        drop(guard);
        let _again = locks.acquire(round_id).await;
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_queue_collapses_pending_requests() {
        let store = Arc::new(MemoryStore::new());
        let round_id = played_round(&store).await;
        let queue = RecomputeQueue::spawn(store.clone(), config());

        for _ in 0..5 {
            queue.schedule(round_id);
        }
        queue.wait_idle().await;

        assert_eq!(store.summary_writes(), 1);
        assert_eq!(store.summary_count(round_id).await, 1);
        assert!(queue.dead_letters().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_recomputes_do_not_duplicate() {
        let store = Arc::new(MemoryStore::new());
        let round_id = played_round(&store).await;
        let queue = RecomputeQueue::spawn(store.clone(), config());

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let queue = queue.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..10 {
                    queue.schedule(round_id);
                    tokio::task::yield_now().await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        queue.wait_idle().await;

        assert_eq!(store.summary_count(round_id).await, 1);

        let summary = store.find_round_summary(round_id).await.unwrap().unwrap();
        let breakdowns = store.list_breakdowns(summary.round_summary_id).await.unwrap();
        let keys: HashSet<_> = breakdowns.iter().map(|b| (b.kind, b.bucket)).collect();
        assert_eq!(keys.len(), breakdowns.len());
        assert!(queue.dead_letters().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_round_is_dead_lettered() {
        let store = Arc::new(MemoryStore::new());
        let queue = RecomputeQueue::spawn(store.clone(), config());
        let round_id = Uuid::new_v4();

        queue.schedule(round_id);
        queue.wait_idle().await;

        let dead = queue.dead_letters();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].round_id, round_id);
        assert_eq!(dead[0].attempts, 1);
        assert_eq!(store.summary_writes(), 0);
    }
}
