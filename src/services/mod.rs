pub mod csv_parser;
pub mod data_store;
pub mod fetcher;
pub mod loader;
pub mod pagination;

pub use csv_parser::parse_records;
pub use data_store::{DataStore, DatasetSnapshot, SharedDataStore};
pub use fetcher::{CsvSource, HttpFetcher, RetryPolicy};
pub use loader::{populate, spawn_populate};
pub use pagination::{Page, PaginationService};
