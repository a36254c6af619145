use reelnet_core::AppError;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("../../crates/infrastructure/migrations");

pub async fn connect_database(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

/// Applies pending migrations for the role assignment and audit tables.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!(known = MIGRATOR.iter().count(), "database schema is up to date");
    Ok(())
}
