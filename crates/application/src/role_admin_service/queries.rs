use reelnet_core::{ActorId, AppResult};
use reelnet_domain::{AccessRequirement, Permission, Role, SessionContext};

use crate::{AuditLogEntry, AuditLogQuery, RoleAssignment, RoleAssignmentQuery};

use super::RoleAdminService;

const STAFF_DIRECTORY_REQUIREMENT: AccessRequirement = AccessRequirement::MinimumRole(Role::Admin);

impl RoleAdminService {
    /// Returns the active assignment for an actor.
    ///
    /// Actors may always read their own assignment.
    pub async fn current_assignment(
        &self,
        session: &SessionContext,
        actor_id: &ActorId,
    ) -> AppResult<Option<RoleAssignment>> {
        let is_self = session
            .actor()
            .is_some_and(|access| access.actor_id() == actor_id);
        if !is_self {
            self.authorization_service
                .require(session, STAFF_DIRECTORY_REQUIREMENT)?;
        }

        self.repository.find_active_assignment(actor_id).await
    }

    /// Lists active assignments for administrative users.
    pub async fn list_active_assignments(
        &self,
        session: &SessionContext,
        query: RoleAssignmentQuery,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.authorization_service
            .require(session, STAFF_DIRECTORY_REQUIREMENT)?;

        self.repository.list_active_assignments(query).await
    }

    /// Lists the assignment history of an actor, newest first.
    pub async fn assignment_history(
        &self,
        session: &SessionContext,
        actor_id: &ActorId,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.authorization_service
            .require(session, STAFF_DIRECTORY_REQUIREMENT)?;

        self.repository.list_assignment_history(actor_id).await
    }

    /// Lists recent audit entries for report viewers.
    pub async fn list_audit_log(
        &self,
        session: &SessionContext,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.authorization_service.require(
            session,
            AccessRequirement::Permission(Permission::ViewReports),
        )?;

        self.audit_log_repository.list_recent_entries(query).await
    }
}
