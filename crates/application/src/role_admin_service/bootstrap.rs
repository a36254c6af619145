use reelnet_core::{AppResult, UserIdentity};
use reelnet_domain::{AuditAction, Role};

use crate::{AuditEvent, NewRoleAssignment, RoleAssignment};

use super::RoleAdminService;

impl RoleAdminService {
    /// Seeds a `super_admin` assignment for a bootstrap-token login.
    ///
    /// Only actors that never held an assignment are seeded. An active
    /// assignment is returned unchanged; revoked actors get `None` and resolve
    /// to the `user` role.
    pub async fn bootstrap_operator(
        &self,
        identity: &UserIdentity,
    ) -> AppResult<Option<RoleAssignment>> {
        let actor_id = identity.actor_id();
        if let Some(existing) = self.repository.find_active_assignment(actor_id).await? {
            return Ok(Some(existing));
        }

        if !self
            .repository
            .list_assignment_history(actor_id)
            .await?
            .is_empty()
        {
            return Ok(None);
        }

        let assignment = self
            .repository
            .upsert_active_assignment(NewRoleAssignment {
                actor_id: actor_id.clone(),
                role: Role::SuperAdmin,
                permission_overrides: None,
                assigned_by: actor_id.clone(),
            })
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: actor_id.clone(),
                action: AuditAction::SecuritySessionBootstrapped,
                resource_type: "actor_role".to_owned(),
                resource_id: actor_id.to_string(),
                detail: Some("seeded super_admin through bootstrap token".to_owned()),
            })
            .await?;

        Ok(Some(assignment))
    }
}
