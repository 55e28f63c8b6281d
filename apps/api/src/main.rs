mod analysis;
mod config;
mod db;
mod errors;
mod models;
mod roadmap;
mod routes;
mod session;
mod sources;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, create_redis};
use crate::routes::build_router;
use crate::session::persistence::RedisSessionRepository;
use crate::session::service::SessionService;
use crate::sources::candidates::PgCandidateSource;
use crate::sources::catalog::RoleCatalog;
use crate::sources::http::HttpRequirementSource;
use crate::sources::RequirementSource;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skill Gap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (session records)
    let redis = create_redis(&config.redis_url).await?;

    // Role requirements: remote service when configured, otherwise the on-disk catalog
    let requirements: Arc<dyn RequirementSource> = match &config.requirements_api_url {
        Some(url) => {
            info!("Using requirements service at {url}");
            Arc::new(HttpRequirementSource::new(url.clone())?)
        }
        None => Arc::new(RoleCatalog::load(&config.role_catalog_path)?),
    };

    let sessions = SessionService::new(
        Arc::new(RedisSessionRepository::new(redis)),
        requirements,
        Arc::new(PgCandidateSource::new(db.clone())),
        config.soft_delete_settle,
    );
    info!(
        "Session service initialized (soft delete settle: {}ms)",
        config.soft_delete_settle.as_millis()
    );

    // Build app state
    let state = AppState {
        db,
        sessions: Arc::new(sessions),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
