use crate::constants::{HEADER_DATASET_STATE, HEADER_TOTAL_COUNT};
use crate::models::{DatasetState, PageRequest};
use crate::server::AppState;
use crate::services::{PaginationService, SharedDataStore};
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::{Query, QueryRejection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Query parameters for /get-csv-data
///
/// Kept as raw strings: anything that is not a positive integer silently
/// becomes the default instead of producing a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<String>,

    /// Records per page (default 10)
    pub limit: Option<String>,
}

/// GET /get-csv-data - One page of index records as a JSON array
///
/// Always 200. Out-of-range pages and a dataset that is still loading (or
/// failed to load) give `[]`; the `x-dataset-state` header says which.
///
/// Examples:
/// - /get-csv-data (page 1, 10 records)
/// - /get-csv-data?page=2&limit=15
#[instrument(skip(pagination, params))]
pub async fn get_csv_data_handler(
    State(pagination): State<PaginationService>,
    params: Result<Query<PageQuery>, QueryRejection>,
) -> impl IntoResponse {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable query string, using defaults");
            PageQuery::default()
        }
    };

    let request = PageRequest::from_raw(params.page.as_deref(), params.limit.as_deref());
    let page = pagination.get_page(request).await;

    debug!(
        page = page.request.page,
        limit = page.request.limit,
        returned = page.len(),
        total = page.total,
        state = %page.state,
        "Serving page"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_DATASET_STATE),
        HeaderValue::from_static(page.state.as_str()),
    );
    headers.insert(HeaderName::from_static(HEADER_TOTAL_COUNT), HeaderValue::from(page.total));

    (StatusCode::OK, headers, Json(page))
}

/// Body of GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub state: DatasetState,
    pub record_count: usize,
    pub columns: Vec<String>,
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub source_url: String,
    pub max_limit: usize,
    pub uptime_secs: u64,
    pub current_system_time: String,
}

/// GET /health - Readiness of the dataset and basic process info
#[instrument(skip(data_store, app_state))]
pub async fn health_handler(
    State(data_store): State<SharedDataStore>,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    let snapshot = data_store.snapshot().await;

    let report = HealthReport {
        state: snapshot.state,
        record_count: snapshot.dataset.len(),
        columns: snapshot.dataset.columns().to_vec(),
        generation: snapshot.generation,
        loaded_at: snapshot.loaded_at,
        last_error: snapshot.last_error,
        source_url: app_state.source_url.to_string(),
        max_limit: app_state.pagination.max_limit(),
        uptime_secs: app_state.started_at.elapsed().as_secs(),
        current_system_time: Utc::now().to_rfc3339(),
    };

    debug!(state = %report.state, records = report.record_count, "Returning health report");

    (StatusCode::OK, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::router;
    use crate::services::{DataStore, parse_records};
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const TWO_ROWS: &str = "index_name,index_date,open_index_value\nNifty50,2024-01-01,21000.5\nSensex,2024-01-01,71000.25\n";

    fn ready_state(text: &str, max_limit: usize) -> AppState {
        let store = Arc::new(DataStore::with_dataset(parse_records(text).unwrap()));
        AppState::new(store, max_limit, "http://fixture/dump.csv")
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, headers, json)
    }

    #[tokio::test]
    async fn test_get_first_page() {
        let (status, headers, body) = get(ready_state(TWO_ROWS, 0), "/get-csv-data?page=1&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([{
                "index_name": "Nifty50",
                "index_date": "2024-01-01",
                "open_index_value": "21000.5"
            }])
        );
        assert_eq!(headers[HEADER_DATASET_STATE], "ready");
        assert_eq!(headers[HEADER_TOTAL_COUNT], "2");
    }

    #[tokio::test]
    async fn test_second_and_out_of_range_pages() {
        let (_, _, body) = get(ready_state(TWO_ROWS, 0), "/get-csv-data?page=2&limit=1").await;
        assert_eq!(body[0]["index_name"], "Sensex");

        let (status, _, body) = get(ready_state(TWO_ROWS, 0), "/get-csv-data?page=3&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_invalid_params_use_defaults() {
        let mut text = String::from("index_name\n");
        for i in 0..15 {
            text.push_str(&format!("idx{}\n", i));
        }

        for uri in [
            "/get-csv-data",
            "/get-csv-data?page=abc&limit=xyz",
            "/get-csv-data?page=&limit=",
            "/get-csv-data?page=-1&limit=0",
        ] {
            let (status, _, body) = get(ready_state(&text, 0), uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            let rows = body.as_array().unwrap();
            assert_eq!(rows.len(), 10, "{}", uri);
            assert_eq!(rows[0]["index_name"], "idx0", "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_limit_capped_by_max() {
        let mut text = String::from("index_name\n");
        for i in 0..30 {
            text.push_str(&format!("idx{}\n", i));
        }
        let (_, _, body) = get(ready_state(&text, 5), "/get-csv-data?limit=100").await;
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_not_ready_returns_empty_array_with_state() {
        let store = Arc::new(DataStore::new());
        store.mark_populating().await;
        let state = AppState::new(store, 0, "http://fixture/dump.csv");

        let (status, headers, body) = get(state, "/get-csv-data?page=1&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
        assert_eq!(headers[HEADER_DATASET_STATE], "populating");
        assert_eq!(headers[HEADER_TOTAL_COUNT], "0");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = router(ready_state(TWO_ROWS, 0))
            .oneshot(
                Request::builder()
                    .uri("/get-csv-data")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = router(ready_state(TWO_ROWS, 0))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/get-csv-data")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_health_reports_state() {
        let (status, _, body) = get(ready_state(TWO_ROWS, 25), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let report: HealthReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.state, DatasetState::Ready);
        assert_eq!(report.record_count, 2);
        assert_eq!(report.columns, vec!["index_name", "index_date", "open_index_value"]);
        assert_eq!(report.max_limit, 25);
        assert_eq!(report.source_url, "http://fixture/dump.csv");
        assert!(report.last_error.is_none());
    }

    #[tokio::test]
    async fn test_health_after_failed_load() {
        let store = Arc::new(DataStore::new());
        store.mark_failed("Fetch error: timed out").await;
        let state = AppState::new(store, 0, "http://fixture/dump.csv");

        let (_, _, body) = get(state, "/health").await;
        assert_eq!(body["state"], "failed");
        assert_eq!(body["record_count"], 0);
        assert_eq!(body["last_error"], "Fetch error: timed out");
    }
}
