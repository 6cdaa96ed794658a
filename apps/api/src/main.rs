mod catalog;
mod config;
mod errors;
mod learners;
mod models;
mod pathing;
mod progress;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::domains::DomainTable;
use crate::catalog::ingest::load_catalog;
use crate::config::Config;
use crate::learners::ingest::seed_profiles;
use crate::learners::store::ProfileStore;
use crate::pathing::path_builder::RuleBasedPathBuilder;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LearnPath API v{}", env!("CARGO_PKG_VERSION"));

    // Domain requirements: external file when configured, compiled-in otherwise
    let domains = match &config.domain_table_path {
        Some(path) => DomainTable::load(path)?,
        None => DomainTable::builtin()?,
    };
    info!("Domain table loaded ({} domains)", domains.len());

    let catalog = load_catalog(&config.catalog_path)?;
    if catalog.is_empty() {
        warn!("Course catalog is empty; generated paths will contain no courses");
    }

    let profiles = ProfileStore::new();
    seed_profiles(&profiles, &config.profiles_path)?;

    let state = AppState {
        catalog: Arc::new(catalog),
        domains: Arc::new(domains),
        profiles: Arc::new(profiles),
        path_builder: Arc::new(RuleBasedPathBuilder),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
