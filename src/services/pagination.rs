use crate::models::{Dataset, DatasetState, IndexRecord, PageRequest};
use crate::services::SharedDataStore;
use serde::ser::{Serialize, Serializer};
use std::sync::Arc;

/// One page of records plus the state of the store it was cut from.
///
/// The page holds on to its dataset generation, so the records stay valid
/// even if the store is replaced while the response is being written.
#[derive(Debug, Clone)]
pub struct Page {
    pub state: DatasetState,
    pub request: PageRequest,
    /// Number of records in the dataset the page was taken from
    pub total: usize,
    dataset: Arc<Dataset>,
    start: usize,
    end: usize,
}

impl Page {
    pub fn records(&self) -> &[IndexRecord] {
        self.dataset.slice(self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// A page serializes as a bare JSON array of records
impl Serialize for Page {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.records())
    }
}

/// Cuts fixed-size pages out of the live dataset
#[derive(Debug, Clone)]
pub struct PaginationService {
    store: SharedDataStore,
    max_limit: usize,
}

impl PaginationService {
    /// `max_limit` caps the page size; zero means uncapped
    pub fn new(store: SharedDataStore, max_limit: usize) -> Self {
        Self { store, max_limit }
    }

    pub fn store(&self) -> &SharedDataStore {
        &self.store
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Records at `[(page-1)*limit, page*limit)`, clamped to the dataset.
    ///
    /// Never fails: out-of-range pages and a store that is not ready yet both
    /// give an empty page, told apart by `Page::state`.
    pub async fn get_page(&self, request: PageRequest) -> Page {
        let request = request.with_max_limit(self.max_limit);
        let snapshot = self.store.snapshot().await;
        let (start, end) = request.offsets();
        let total = snapshot.dataset.len();

        Page {
            state: snapshot.state,
            request,
            total,
            dataset: snapshot.dataset,
            start: start.min(total),
            end: end.min(total),
        }
    }

    /// Same as `get_page`, from raw query-string values
    pub async fn get_page_raw(&self, page: Option<&str>, limit: Option<&str>) -> Page {
        self.get_page(PageRequest::from_raw(page, limit)).await
    }
}
