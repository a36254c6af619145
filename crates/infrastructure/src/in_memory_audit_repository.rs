use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use reelnet_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
use reelnet_core::AppResult;

/// In-memory audit repository serving both the append and read ports.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.entries.write().await.push(AuditLogEntry {
            event_id: Uuid::new_v4().to_string(),
            actor_id: event.actor_id.to_string(),
            action: event.action.as_str().to_owned(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            detail: event.detail,
            created_at: Utc::now(),
        });

        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .filter(|entry| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| entry.action == action)
            })
            .filter(|entry| {
                query
                    .actor_id
                    .as_deref()
                    .is_none_or(|actor_id| entry.actor_id == actor_id)
            })
            .skip(query.offset.min(5_000))
            .take(query.limit.clamp(1, 200))
            .cloned()
            .collect())
    }
}
