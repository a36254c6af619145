use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use reelnet_core::{ActorId, AppResult};
use reelnet_domain::{ActorAccess, PermissionSet, Role, default_permissions};

/// Persisted binding of an actor to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Stable assignment identifier.
    pub assignment_id: Uuid,
    /// Actor the role is bound to.
    pub actor_id: ActorId,
    /// Assigned role.
    pub role: Role,
    /// Explicit permission set replacing the role defaults.
    pub permission_overrides: Option<PermissionSet>,
    /// Actor that created the assignment.
    pub assigned_by: ActorId,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Whether this is the actor's authoritative assignment.
    pub is_active: bool,
    /// Actor that revoked the assignment.
    pub revoked_by: Option<ActorId>,
    /// Revocation timestamp.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RoleAssignment {
    /// Returns the permission set enforced for this assignment.
    #[must_use]
    pub fn effective_permissions(&self) -> PermissionSet {
        self.permission_overrides
            .clone()
            .unwrap_or_else(|| default_permissions(self.role))
    }

    /// Projects the assignment into request-scoped actor access.
    #[must_use]
    pub fn to_access(&self) -> ActorAccess {
        ActorAccess::new(
            self.actor_id.clone(),
            self.role,
            self.permission_overrides.clone(),
        )
    }
}

/// Write model for a new active assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoleAssignment {
    /// Target actor.
    pub actor_id: ActorId,
    /// Role to assign.
    pub role: Role,
    /// Optional explicit permission set.
    pub permission_overrides: Option<PermissionSet>,
    /// Actor performing the assignment.
    pub assigned_by: ActorId,
}

/// Filters for listing active assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentQuery {
    /// Optional role filter.
    pub role: Option<Role>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

impl Default for RoleAssignmentQuery {
    fn default() -> Self {
        Self {
            role: None,
            limit: 100,
            offset: 0,
        }
    }
}

/// Repository port for role assignments.
///
/// Implementations keep at most one active assignment per actor.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Finds the active assignment for an actor.
    async fn find_active_assignment(&self, actor_id: &ActorId)
    -> AppResult<Option<RoleAssignment>>;

    /// Atomically replaces the actor's assignment with a new active one.
    ///
    /// The previous assignment, active or not, is retained in history.
    async fn upsert_active_assignment(&self, input: NewRoleAssignment)
    -> AppResult<RoleAssignment>;

    /// Deactivates the actor's active assignment, returning the revoked record.
    async fn deactivate_assignment(
        &self,
        actor_id: &ActorId,
        revoked_by: &ActorId,
    ) -> AppResult<Option<RoleAssignment>>;

    /// Lists active assignments ordered by actor identifier.
    async fn list_active_assignments(
        &self,
        query: RoleAssignmentQuery,
    ) -> AppResult<Vec<RoleAssignment>>;

    /// Lists every assignment recorded for an actor, newest first.
    async fn list_assignment_history(&self, actor_id: &ActorId) -> AppResult<Vec<RoleAssignment>>;
}
