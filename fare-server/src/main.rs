use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fare_server::config::AppConfig;
use fare_server::nominatim::NominatimClient;
use fare_server::osrm::OsrmClient;
use fare_server::pipeline::TripResolutionPipeline;
use fare_server::region::RegionDetector;
use fare_server::routing::RouteResolver;
use fare_server::scoring::ProcessScorer;
use fare_server::store::InMemoryTripStore;
use fare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fare_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let osrm = OsrmClient::new(config.osrm.clone()).context("failed to create OSRM client")?;
    let nominatim =
        NominatimClient::new(config.nominatim.clone()).context("failed to create Nominatim client")?;
    let scorer = ProcessScorer::new(config.scorer.clone());

    info!(
        osrm = %config.osrm.base_url,
        nominatim = %config.nominatim.base_url,
        scorer = %config.scorer.script.display(),
        "collaborators configured"
    );

    let pipeline = TripResolutionPipeline::new(
        RouteResolver::new(Arc::new(osrm)),
        RegionDetector::new(Arc::new(nominatim)),
        Arc::new(scorer),
    );
    let state = AppState::new(pipeline, Arc::new(InMemoryTripStore::new()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Taxi Price Predictor listening");
    info!("  GET  /health       - Health check");
    info!("  POST /api/predict  - Predict a fare");
    info!("  GET  /api/history  - Prediction history");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
