use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fare_server::collector::Collector;
use fare_server::config::{AppConfig, Command};
use fare_server::domain::local_date;
use fare_server::link::{CachedShortener, HttpShortener};
use fare_server::serving::RoundTripIndex;
use fare_server::store::JsonFileStore;
use fare_server::upstream::UpstreamClient;
use fare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fare_server=info")),
        )
        .init();

    let command = match Command::from_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            error!(error = %e, "usage: fare-server [serve|reindex|check]");
            std::process::exit(2);
        }
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // Open the document store and load the last known-good index
    let store = Arc::new(JsonFileStore::open(&config.data_dir).expect("Failed to open data directory"));
    let index = RoundTripIndex::load(store.as_ref()).expect("Failed to load round-trip index");
    info!(
        round_trips = index.len().await,
        data_dir = %config.data_dir.display(),
        "loaded serving index"
    );

    let upstream = UpstreamClient::new(config.upstream.clone()).expect("Failed to create upstream client");
    let collector = Collector::new(upstream, store, config.collector.clone(), index.clone());

    match command {
        Command::Serve => {}
        Command::Reindex => {
            match collector.reindex(Utc::now()).await {
                Ok(round_trips) => info!(round_trips, "reindex finished"),
                Err(e) => {
                    error!(error = %e, "reindex failed");
                    std::process::exit(1);
                }
            }
            return;
        }
        Command::Check => {
            let today = local_date(Utc::now(), config.collector.utc_offset_secs);
            match collector.check_integrity(today) {
                Ok(missing) if missing.is_empty() => info!("stored fares cover every window date"),
                Ok(missing) => {
                    for date in &missing {
                        warn!(%date, "no stored fares");
                    }
                    std::process::exit(1);
                }
                Err(e) => {
                    error!(error = %e, "integrity check failed");
                    std::process::exit(1);
                }
            }
            return;
        }
    }

    if config.link.api_key.is_none() {
        warn!("SHORTENER_API_KEY not set. Link shortening will likely fail.");
    }

    // Spawn the collector; runs never overlap
    tokio::spawn(async move {
        collector.run_forever().await;
    });

    // Build app state
    let shortener = HttpShortener::new(&config.link).expect("Failed to create link shortener");
    let state = AppState::new(
        index,
        config.selection.clone(),
        CachedShortener::new(shortener, &config.link),
        config.link.booking_url.clone(),
    );

    let app = create_router(state);

    let addr = config.listen_addr;
    info!(%addr, "fare server listening");
    info!("  GET  /health  - Health check");
    info!("  GET  /status  - Index size and last collection time");
    info!("  POST /select  - Select round trips");
    info!("  GET  /link    - Booking link for a round trip");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
