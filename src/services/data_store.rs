use crate::models::{Dataset, DatasetState, IndexRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

// Shared data store for passing between tasks
pub type SharedDataStore = Arc<DataStore>;

/// Everything a reader needs, captured under one lock acquisition.
///
/// Holding a snapshot keeps its dataset generation alive even if the store
/// swaps in a new one afterwards.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub state: DatasetState,
    pub dataset: Arc<Dataset>,
    /// Bumped on every successful `replace`
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct Inner {
    state: DatasetState,
    dataset: Arc<Dataset>,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// In-memory holder of the live dataset and its readiness state.
///
/// Writers swap a whole `Arc<Dataset>`; readers clone the `Arc` and drop the
/// lock before touching records, so a reader sees either the previous
/// generation or the next one in full.
#[derive(Debug)]
pub struct DataStore {
    inner: RwLock<Inner>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    /// Empty store, nothing loaded yet
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: DatasetState::Empty,
                dataset: Arc::new(Dataset::empty()),
                generation: 0,
                loaded_at: None,
                last_error: None,
            }),
        }
    }

    /// Store that is already `Ready` with the given dataset
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: DatasetState::Ready,
                dataset: Arc::new(dataset),
                generation: 1,
                loaded_at: Some(Utc::now()),
                last_error: None,
            }),
        }
    }

    pub async fn snapshot(&self) -> DatasetSnapshot {
        let inner = self.inner.read().await;
        DatasetSnapshot {
            state: inner.state,
            dataset: inner.dataset.clone(),
            generation: inner.generation,
            loaded_at: inner.loaded_at,
            last_error: inner.last_error.clone(),
        }
    }

    pub async fn state(&self) -> DatasetState {
        self.inner.read().await.state
    }

    /// Swap in a new dataset generation and mark the store ready.
    ///
    /// Returns the new generation number.
    pub async fn replace(&self, dataset: Dataset) -> u64 {
        let records = dataset.len();
        let dataset = Arc::new(dataset);

        let mut inner = self.inner.write().await;
        let previous = std::mem::replace(&mut inner.dataset, dataset);
        inner.state = DatasetState::Ready;
        inner.generation += 1;
        inner.loaded_at = Some(Utc::now());
        inner.last_error = None;
        let generation = inner.generation;
        drop(inner);

        info!(
            generation,
            records,
            previous_records = previous.len(),
            "Dataset replaced"
        );
        generation
    }

    /// A load attempt has started
    pub async fn mark_populating(&self) {
        let mut inner = self.inner.write().await;
        debug!(from = %inner.state, "Dataset populating");
        inner.state = DatasetState::Populating;
    }

    /// A load attempt failed. The live dataset is left as it was (empty on
    /// first load).
    pub async fn mark_failed(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut inner = self.inner.write().await;
        warn!(
            from = %inner.state,
            records = inner.dataset.len(),
            reason = %reason,
            "Dataset load failed"
        );
        inner.state = DatasetState::Failed;
        inner.last_error = Some(reason);
    }

    pub async fn current_length(&self) -> usize {
        self.inner.read().await.dataset.len()
    }

    /// Owned copy of the records in `[start, end)`, clamped to bounds
    pub async fn slice(&self, start: usize, end: usize) -> Vec<IndexRecord> {
        let dataset = self.inner.read().await.dataset.clone();
        dataset.slice(start, end).to_vec()
    }
}
