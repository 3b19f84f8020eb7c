//! Storage for completed trip estimates.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::TripRecord;

/// Errors from a trip store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("trip store unavailable: {0}")]
    Unavailable(String),
}

/// Persists trip records and lists them newest first.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn save(&self, record: TripRecord) -> Result<(), StoreError>;

    /// Up to `limit` records ordered by `created_at` descending, skipping
    /// the first `offset`.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<TripRecord>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// Records kept by [`InMemoryTripStore::default`].
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Process-local store. Contents are lost on restart.
///
/// Records are kept newest first as they are saved, so listing is a plain
/// skip-and-take. Once `capacity` records are held, saving evicts the
/// oldest; `count` reports what is retained.
#[derive(Debug)]
pub struct InMemoryTripStore {
    records: RwLock<VecDeque<TripRecord>>,
    capacity: usize,
}

impl Default for InMemoryTripStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding at most `capacity` records (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn save(&self, record: TripRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        // Ahead of any record with an equal timestamp: latest saved first.
        let at = records.partition_point(|r| r.created_at > record.created_at);
        records.insert(at, record);
        records.truncate(self.capacity);
        Ok(())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<TripRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }
}
