use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use reelnet_application::{
    NewRoleAssignment, RoleAssignment, RoleAssignmentQuery, RoleAssignmentRepository,
};
use reelnet_core::{ActorId, AppResult};

#[derive(Debug, Default)]
struct AssignmentState {
    current: HashMap<ActorId, RoleAssignment>,
    history: Vec<RoleAssignment>,
}

/// In-memory role assignment repository implementation.
///
/// A single lock guards current and historical rows so replacements are atomic.
#[derive(Debug, Default)]
pub struct InMemoryRoleAssignmentRepository {
    state: RwLock<AssignmentState>,
}

impl InMemoryRoleAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleAssignmentRepository {
    async fn find_active_assignment(
        &self,
        actor_id: &ActorId,
    ) -> AppResult<Option<RoleAssignment>> {
        Ok(self
            .state
            .read()
            .await
            .current
            .get(actor_id)
            .filter(|assignment| assignment.is_active)
            .cloned())
    }

    async fn upsert_active_assignment(
        &self,
        input: NewRoleAssignment,
    ) -> AppResult<RoleAssignment> {
        let assignment = RoleAssignment {
            assignment_id: Uuid::new_v4(),
            actor_id: input.actor_id,
            role: input.role,
            permission_overrides: input.permission_overrides,
            assigned_by: input.assigned_by,
            assigned_at: Utc::now(),
            is_active: true,
            revoked_by: None,
            revoked_at: None,
        };

        let mut state = self.state.write().await;
        if let Some(mut previous) = state
            .current
            .insert(assignment.actor_id.clone(), assignment.clone())
        {
            previous.is_active = false;
            state.history.push(previous);
        }

        Ok(assignment)
    }

    async fn deactivate_assignment(
        &self,
        actor_id: &ActorId,
        revoked_by: &ActorId,
    ) -> AppResult<Option<RoleAssignment>> {
        let mut state = self.state.write().await;
        let Some(assignment) = state
            .current
            .get_mut(actor_id)
            .filter(|assignment| assignment.is_active)
        else {
            return Ok(None);
        };

        assignment.is_active = false;
        assignment.revoked_by = Some(revoked_by.clone());
        assignment.revoked_at = Some(Utc::now());

        Ok(Some(assignment.clone()))
    }

    async fn list_active_assignments(
        &self,
        query: RoleAssignmentQuery,
    ) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.read().await;

        let mut values: Vec<RoleAssignment> = state
            .current
            .values()
            .filter(|assignment| assignment.is_active)
            .filter(|assignment| query.role.is_none_or(|role| assignment.role == role))
            .cloned()
            .collect();
        values.sort_by(|left, right| left.actor_id.cmp(&right.actor_id));

        Ok(values
            .into_iter()
            .skip(query.offset)
            .take(query.limit.max(1))
            .collect())
    }

    async fn list_assignment_history(&self, actor_id: &ActorId) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.read().await;

        let mut values: Vec<RoleAssignment> = state
            .history
            .iter()
            .chain(state.current.get(actor_id))
            .filter(|assignment| &assignment.actor_id == actor_id)
            .cloned()
            .collect();
        values.reverse();

        Ok(values)
    }
}

#[cfg(test)]
mod tests;
