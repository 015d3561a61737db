pub mod api;

use crate::constants::{HEADER_DATASET_STATE, HEADER_TOTAL_COUNT};
use crate::services::{PaginationService, SharedDataStore};
use axum::http::{HeaderName, Method};
use axum::{Router, extract::FromRef, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub data: SharedDataStore,
    pub pagination: PaginationService,
    /// Where the dataset was (or is being) loaded from
    pub source_url: Arc<str>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(data: SharedDataStore, max_limit: usize, source_url: impl Into<Arc<str>>) -> Self {
        Self {
            pagination: PaginationService::new(data.clone(), max_limit),
            data,
            source_url: source_url.into(),
            started_at: Instant::now(),
        }
    }
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for SharedDataStore {
    fn from_ref(app_state: &AppState) -> SharedDataStore {
        app_state.data.clone()
    }
}

impl FromRef<AppState> for PaginationService {
    fn from_ref(app_state: &AppState) -> PaginationService {
        app_state.pagination.clone()
    }
}

/// The dashboard runs on another origin, so every origin may read pages.
/// No credentials are involved.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(HEADER_DATASET_STATE),
            HeaderName::from_static(HEADER_TOTAL_COUNT),
        ])
}

/// Build the router with all routes and middleware
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/get-csv-data", get(api::get_csv_data_handler))
        .route("/health", get(api::health_handler))
        .layer(cors_layer())
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Registering routes:");
    tracing::info!("  GET /get-csv-data?page=1&limit=10");
    tracing::info!("  GET /health");

    let app = router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
