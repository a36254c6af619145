use std::sync::Arc;

use reelnet_core::ActorId;
use reelnet_domain::{AccessRequirement, Permission, PermissionSet, Role, default_permissions};

use crate::{AuditLogRepository, AuditRepository, AuthorizationService, RoleAssignmentRepository};

mod assignment;
mod bootstrap;
mod queries;

/// Requirements a caller must meet to assign or revoke roles.
pub const ROLE_MANAGEMENT_REQUIREMENTS: [AccessRequirement; 2] = [
    AccessRequirement::MinimumRole(Role::Admin),
    AccessRequirement::Permission(Permission::ManageRoles),
];

/// Role catalog entry exposed to administrative views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalogEntry {
    /// Role value.
    pub role: Role,
    /// Privilege rank.
    pub rank: u8,
    /// Default permission set.
    pub default_permissions: PermissionSet,
}

/// Input payload for assigning a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRoleInput {
    /// Actor receiving the role.
    pub target_actor_id: ActorId,
    /// Untrusted role value.
    pub role: String,
    /// Optional explicit permission set replacing role defaults.
    pub permission_overrides: Option<PermissionSet>,
}

/// Application service for role administration workflows.
#[derive(Clone)]
pub struct RoleAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn RoleAssignmentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl RoleAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn RoleAssignmentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
            audit_log_repository,
        }
    }

    /// Returns every role with its rank and default permissions.
    #[must_use]
    pub fn role_catalog(&self) -> Vec<RoleCatalogEntry> {
        Role::all()
            .iter()
            .map(|role| RoleCatalogEntry {
                role: *role,
                rank: role.rank(),
                default_permissions: default_permissions(*role),
            })
            .collect()
    }
}
