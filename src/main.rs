//! Binary entrypoint. Boots the Axum HTTP server, wiring the source
//! registry, aggregator, routes, and metrics.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trendscope::aggregator::Aggregator;
use trendscope::api::{self, AppState};
use trendscope::config::SourcesConfig;
use trendscope::fallback::FallbackProvider;
use trendscope::metrics::Metrics;
use trendscope::sources::SourceRegistry;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trendscope=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = Metrics::init();

    // Registry and aggregator are constructed once and injected; adapters
    // are reused across requests, credentials read from the environment.
    let config = SourcesConfig::load_default();
    let registry = Arc::new(SourceRegistry::from_env(config));
    let aggregator = Arc::new(Aggregator::new(
        registry.clone(),
        FallbackProvider::load_default(),
    ));

    let state = AppState::new(aggregator, registry);
    let router = api::create_router(state).merge(metrics.router());

    let addr = std::env::var("TRENDSCOPE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "serving");
    axum::serve(listener, router).await?;
    Ok(())
}
