use crate::error::Result;
use crate::services::csv_parser::parse_records;
use crate::services::fetcher::CsvSource;
use crate::services::{DataStore, SharedDataStore};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Fetch, parse and publish one dataset generation.
///
/// The store moves to `Populating` first, then to `Ready` with the new data
/// or to `Failed` with the error. Returns the number of records loaded.
#[instrument(skip_all, fields(source = %source.describe()))]
pub async fn populate<S: CsvSource>(source: &S, store: &DataStore) -> Result<usize> {
    let started = Instant::now();
    store.mark_populating().await;

    let loaded = async {
        let body = source.fetch().await?;
        parse_records(&body)
    }
    .await;

    match loaded {
        Ok(dataset) => {
            let records = dataset.len();
            let columns = dataset.columns().len();
            let generation = store.replace(dataset).await;
            info!(
                records,
                columns,
                generation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Dataset ready"
            );
            Ok(records)
        }
        Err(e) => {
            error!(
                kind = e.kind(),
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Failed to load dataset, serving empty pages"
            );
            store.mark_failed(e.to_string()).await;
            Err(e)
        }
    }
}

/// Run `populate` in the background so the server can accept requests while
/// the download is in flight.
pub fn spawn_populate<S>(source: S, store: SharedDataStore) -> JoinHandle<()>
where
    S: CsvSource + 'static,
{
    tokio::spawn(async move {
        // Outcome is already logged and recorded on the store
        let _ = populate(&source, &store).await;
    })
}
