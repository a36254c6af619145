//! Reelnet access-control API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use reelnet_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_app_state, build_postgres_session_layer, connect_database, run_migrations,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_database(&config.database_url, config.database_max_connections).await?;
    run_migrations(&pool).await?;

    if config.migrate_only {
        return Ok(());
    }

    let session_layer = build_postgres_session_layer(
        pool.clone(),
        config.cookie_secure,
        config.session_idle_minutes,
    )
    .await?;
    let app_state = build_app_state(pool, &config);
    let app = build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "reelnet-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
