use shared::{BoardSnapshot, RunInfo, PROTOCOL_VERSION};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Bounded history of published boards for one simulation run
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<StoreInner>>,
}

struct StoreInner {
    run_id: Uuid,
    rows: usize,
    cols: usize,

    /// Oldest first
    history: VecDeque<Arc<BoardSnapshot>>,
    limit: usize,

    start_time: Instant,
}

impl StoreInner {
    fn push(&mut self, snapshot: BoardSnapshot) {
        while self.history.len() >= self.limit {
            self.history.pop_front();
        }
        self.history.push_back(Arc::new(snapshot));
    }
}

impl SnapshotStore {
    /// Store keeping at most `limit` snapshots (at least one)
    pub fn new(rows: usize, cols: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                run_id: Uuid::new_v4(),
                rows,
                cols,
                history: VecDeque::with_capacity(limit),
                limit,
                start_time: Instant::now(),
            })),
        }
    }

    pub async fn publish(&self, snapshot: BoardSnapshot) {
        self.inner.write().await.push(snapshot);
    }

    /// Publish from a non-async thread. Panics inside an async context.
    pub fn publish_blocking(&self, snapshot: BoardSnapshot) {
        self.inner.blocking_write().push(snapshot);
    }

    pub async fn latest(&self) -> Option<Arc<BoardSnapshot>> {
        self.inner.read().await.history.back().cloned()
    }

    pub async fn by_generation(&self, generation: u64) -> Option<Arc<BoardSnapshot>> {
        let inner = self.inner.read().await;
        inner
            .history
            .iter()
            .rev()
            .find(|snapshot| snapshot.generation == generation)
            .cloned()
    }

    pub async fn run_info(&self) -> RunInfo {
        let inner = self.inner.read().await;
        RunInfo {
            run_id: inner.run_id,
            protocol_version: PROTOCOL_VERSION,
            rows: inner.rows,
            cols: inner.cols,
            latest_generation: inner.history.back().map(|snapshot| snapshot.generation),
            snapshots_held: inner.history.len(),
            uptime_seconds: inner.start_time.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board(generation: u64) -> BoardSnapshot {
        BoardSnapshot {
            generation,
            rows: 2,
            cols: 2,
            cells: vec![vec![None; 2]; 2],
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = SnapshotStore::new(2, 2, 4);
        assert!(store.latest().await.is_none());
        assert!(store.by_generation(0).await.is_none());

        let info = store.run_info().await;
        assert_eq!(info.latest_generation, None);
        assert_eq!(info.snapshots_held, 0);
        assert_eq!(info.protocol_version, PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let store = SnapshotStore::new(2, 2, 2);
        for generation in [0, 10, 20] {
            store.publish(empty_board(generation)).await;
        }

        assert!(store.by_generation(0).await.is_none());
        assert_eq!(store.by_generation(10).await.unwrap().generation, 10);
        assert_eq!(store.latest().await.unwrap().generation, 20);

        let info = store.run_info().await;
        assert_eq!(info.latest_generation, Some(20));
        assert_eq!(info.snapshots_held, 2);
    }

    #[tokio::test]
    async fn test_zero_limit_keeps_latest() {
        let store = SnapshotStore::new(2, 2, 0);
        store.publish(empty_board(1)).await;
        store.publish(empty_board(2)).await;
        assert_eq!(store.run_info().await.snapshots_held, 1);
        assert_eq!(store.latest().await.unwrap().generation, 2);
    }

    #[tokio::test]
    async fn test_clones_share_history() {
        let store = SnapshotStore::new(2, 2, 8);
        let publisher = store.clone();
        tokio::task::spawn_blocking(move || publisher.publish_blocking(empty_board(3)))
            .await
            .unwrap();

        assert_eq!(store.latest().await.unwrap().generation, 3);
        assert_eq!(store.run_info().await.run_id, store.clone().run_info().await.run_id);
    }
}
