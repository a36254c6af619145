use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use reelnet_application::{AuditEvent, AuditRepository};
use reelnet_core::{AppError, AppResult};

/// PostgreSQL-backed audit trail writer.
///
/// Rows land in `audit_log_entries` and are never updated or deleted.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let action = event.action.as_str();
        let event_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO audit_log_entries (actor_id, action, resource_type, resource_id, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(event.actor_id.as_str())
        .bind(action)
        .bind(event.resource_type.as_str())
        .bind(event.resource_id.as_str())
        .bind(event.detail.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            warn!(
                error = %error,
                action,
                actor_id = %event.actor_id,
                "audit append failed"
            );
            AppError::Internal(format!("failed to record audit event '{action}': {error}"))
        })?;

        debug!(%event_id, action, resource_id = %event.resource_id, "audit event recorded");
        Ok(())
    }
}
