//! Defaults for the CSV source, pagination and the HTTP server.
//!
//! Every value here can be overridden from the command line or the
//! environment (see `cli.rs`); these are only the fallbacks.

/// Remote CSV with one row per index per trading day
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/shaktids/stock_app_test/refs/heads/main/dump.csv";

/// Port the dashboard expects the API on
pub const DEFAULT_PORT: u16 = 3000;

/// Page number used when `page` is missing or not a positive integer
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when `limit` is missing or not a positive integer
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound applied to `limit` so one request cannot pull the whole dataset
pub const DEFAULT_MAX_LIMIT: usize = 1000;

/// Per-request timeout for the source download
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Total download attempts (first try included)
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled after each failed attempt
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Ceiling for the retry delay
pub const MAX_RETRY_BACKOFF_MS: u64 = 10_000;

/// Columns published by the upstream dump, in file order
pub mod csv_column {
    pub const INDEX_NAME: &str = "index_name";
    pub const INDEX_DATE: &str = "index_date";
    pub const OPEN_INDEX_VALUE: &str = "open_index_value";
    pub const HIGH_INDEX_VALUE: &str = "high_index_value";
    pub const LOW_INDEX_VALUE: &str = "low_index_value";
    pub const CLOSING_INDEX_VALUE: &str = "closing_index_value";
    pub const VOLUME: &str = "volume";
    pub const TURNOVER_RS_CR: &str = "turnover_rs_cr";
    pub const CHANGE_PERCENT: &str = "change_percent";
    pub const POINTS_CHANGE: &str = "points_change";
}

/// Response header carrying the readiness state a page was served from
pub const HEADER_DATASET_STATE: &str = "x-dataset-state";

/// Response header carrying the number of records in the live dataset
pub const HEADER_TOTAL_COUNT: &str = "x-total-count";
