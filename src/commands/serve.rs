use crate::config::ServerConfig;
use crate::server::{self, AppState};
use crate::services::{DataStore, spawn_populate};
use std::sync::Arc;

pub async fn run(config: ServerConfig) {
    println!("🚀 Starting stockindex server on port {}", config.port);
    println!("📥 CSV source: {}", config.source.url);

    let fetcher = match config.source.fetcher() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let shared_data_store = Arc::new(DataStore::new());

    // Requests are accepted while the download runs; until it finishes pages
    // are empty and carry x-dataset-state: populating
    println!(
        "📊 Loading dataset in the background (timeout {}s, {} attempt(s))...",
        config.source.timeout.as_secs(),
        config.source.retry.max_attempts
    );
    spawn_populate(fetcher, shared_data_store.clone());

    if config.max_limit > 0 {
        println!("📏 Page size capped at {} records", config.max_limit);
    } else {
        println!("📏 Page size uncapped");
    }

    let app_state = AppState::new(shared_data_store, config.max_limit, config.source.url.clone());

    println!("🌐 Server is running on http://localhost:{}", config.port);
    if let Err(e) = server::serve(app_state, config.port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
