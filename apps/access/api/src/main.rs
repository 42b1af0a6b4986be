use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before anything fallible
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;

    info!(
        similarity_threshold = config.embeddings.similarity_threshold,
        request_timeout = ?config.embeddings.request_timeout,
        "Embedding store ready"
    );

    let state = AppState { config, db };

    let api_routes = api::routes(&state);

    let router = create_router::<openapi::ApiDoc>(
        api_routes,
        state.config.cors_allowed_origin.as_deref(),
    )?;

    // /health: liveness with name/version; /ready: database ping
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting access API with graceful shutdown (30s timeout)");

    let AppState { config, db } = state;
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        close_postgres(db, "embeddings").await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Access API shutdown complete");
    Ok(())
}
