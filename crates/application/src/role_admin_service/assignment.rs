use std::str::FromStr;

use reelnet_core::ActorId;
use reelnet_domain::{
    AccessRequirement, ActorAccess, AuditAction, DenyCode, DenyReason, PermissionSet, Role,
    SessionContext,
};

use crate::{AssignmentError, AuditEvent, NewRoleAssignment, RoleAssignment};

use super::{AssignRoleInput, ROLE_MANAGEMENT_REQUIREMENTS, RoleAdminService};

impl RoleAdminService {
    /// Assigns a role to the target actor, superseding any active assignment.
    pub async fn assign_role(
        &self,
        session: &SessionContext,
        input: AssignRoleInput,
    ) -> Result<RoleAssignment, AssignmentError> {
        let caller = self.require_role_management(session)?;
        let role = Role::from_str(input.role.as_str())?;

        ensure_outranks(caller, role)?;
        if let Some(overrides) = input.permission_overrides.as_ref() {
            ensure_holds_overrides(caller, overrides)?;
        }
        self.ensure_outranks_current_role(caller, &input.target_actor_id)
            .await?;

        let assignment = self
            .repository
            .upsert_active_assignment(NewRoleAssignment {
                actor_id: input.target_actor_id,
                role,
                permission_overrides: input.permission_overrides,
                assigned_by: caller.actor_id().clone(),
            })
            .await
            .map_err(AssignmentError::PersistenceFailure)?;

        let detail = if assignment.permission_overrides.is_some() {
            format!(
                "assigned role '{role}' with permission overrides to '{}'",
                assignment.actor_id
            )
        } else {
            format!("assigned role '{role}' to '{}'", assignment.actor_id)
        };

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: caller.actor_id().clone(),
                action: AuditAction::SecurityRoleAssigned,
                resource_type: "actor_role".to_owned(),
                resource_id: assignment.actor_id.to_string(),
                detail: Some(detail),
            })
            .await
            .map_err(|source| AssignmentError::AuditFailure {
                actor_id: assignment.actor_id.clone(),
                source,
            })?;

        Ok(assignment)
    }

    /// Deactivates the target actor's active assignment.
    pub async fn revoke_role(
        &self,
        session: &SessionContext,
        target_actor_id: &ActorId,
    ) -> Result<RoleAssignment, AssignmentError> {
        let caller = self.require_role_management(session)?;
        self.ensure_outranks_current_role(caller, target_actor_id)
            .await?;

        let revoked = self
            .repository
            .deactivate_assignment(target_actor_id, caller.actor_id())
            .await
            .map_err(AssignmentError::PersistenceFailure)?
            .ok_or_else(|| AssignmentError::NoActiveAssignment(target_actor_id.clone()))?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: caller.actor_id().clone(),
                action: AuditAction::SecurityRoleRevoked,
                resource_type: "actor_role".to_owned(),
                resource_id: target_actor_id.to_string(),
                detail: Some(format!(
                    "revoked role '{}' from '{}'",
                    revoked.role, target_actor_id
                )),
            })
            .await
            .map_err(|source| AssignmentError::AuditFailure {
                actor_id: target_actor_id.clone(),
                source,
            })?;

        Ok(revoked)
    }

    fn require_role_management<'a>(
        &self,
        session: &'a SessionContext,
    ) -> Result<&'a ActorAccess, AssignmentError> {
        self.authorization_service
            .authorize_all(session, &ROLE_MANAGEMENT_REQUIREMENTS)
            .into_result()?;

        session.actor().ok_or_else(|| {
            AssignmentError::Unauthorized(DenyReason::new(
                DenyCode::NoSession,
                ROLE_MANAGEMENT_REQUIREMENTS[0],
            ))
        })
    }

    async fn ensure_outranks_current_role(
        &self,
        caller: &ActorAccess,
        target_actor_id: &ActorId,
    ) -> Result<(), AssignmentError> {
        let current = self
            .repository
            .find_active_assignment(target_actor_id)
            .await
            .map_err(AssignmentError::PersistenceFailure)?;

        match current {
            Some(assignment) => ensure_outranks(caller, assignment.role),
            None => Ok(()),
        }
    }
}

/// Callers may only grant or take away roles up to their own rank.
fn ensure_outranks(caller: &ActorAccess, role: Role) -> Result<(), AssignmentError> {
    if caller.role().is_at_least(role) {
        return Ok(());
    }

    Err(AssignmentError::Unauthorized(DenyReason::new(
        DenyCode::InsufficientRole,
        AccessRequirement::MinimumRole(role),
    )))
}

/// Overrides may only grant permissions the caller already holds.
fn ensure_holds_overrides(
    caller: &ActorAccess,
    overrides: &PermissionSet,
) -> Result<(), AssignmentError> {
    if caller.role() == Role::SuperAdmin {
        return Ok(());
    }

    match overrides
        .granted()
        .find(|permission| !caller.permissions().is_granted(*permission))
    {
        Some(permission) => Err(AssignmentError::Unauthorized(DenyReason::new(
            DenyCode::MissingPermission,
            AccessRequirement::Permission(permission),
        ))),
        None => Ok(()),
    }
}
