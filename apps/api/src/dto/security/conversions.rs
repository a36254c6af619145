use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use reelnet_application::{
    AuditLogEntry, AuditLogQuery, RoleAssignment, RoleAssignmentQuery, RoleCatalogEntry,
};
use reelnet_core::{AppError, AppResult};
use reelnet_domain::{AccessRequirement, Decision, Permission, PermissionSet, Role};

use super::{
    AccessCheckRequest, AccessCheckResponse, AuditLogEntryResponse, AuditLogQueryParams,
    RoleAssignmentListQuery, RoleAssignmentResponse, RoleCatalogEntryResponse,
};

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn permission_names(permissions: &PermissionSet) -> Vec<String> {
    permissions
        .granted()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}

/// Parses transport permission names into an explicit permission set.
pub fn permission_overrides_from_transport(
    values: Option<Vec<String>>,
) -> AppResult<Option<PermissionSet>> {
    values
        .map(|values| {
            values
                .iter()
                .map(|value| Permission::from_transport(value.as_str()))
                .collect::<AppResult<Vec<_>>>()
                .map(PermissionSet::from_granted)
        })
        .transpose()
}

impl TryFrom<AccessCheckRequest> for AccessRequirement {
    type Error = AppError;

    fn try_from(value: AccessCheckRequest) -> Result<Self, Self::Error> {
        match value.kind.as_str() {
            "minimum_role" => Ok(Self::MinimumRole(Role::from_str(value.value.as_str())?)),
            "permission" => Ok(Self::Permission(Permission::from_transport(
                value.value.as_str(),
            )?)),
            other => Err(AppError::Validation(format!(
                "unknown access requirement kind '{other}'"
            ))),
        }
    }
}

impl AccessCheckResponse {
    /// Creates a response for an evaluated requirement.
    #[must_use]
    pub fn from_decision(requirement: AccessRequirement, decision: Decision) -> Self {
        Self {
            allowed: decision.is_allowed(),
            requirement: requirement.to_string(),
            reason: decision
                .deny_reason()
                .map(|reason| reason.code().as_str().to_owned()),
        }
    }
}

impl TryFrom<RoleAssignmentListQuery> for RoleAssignmentQuery {
    type Error = AppError;

    fn try_from(value: RoleAssignmentListQuery) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        Ok(Self {
            role: value
                .role
                .as_deref()
                .map(Role::from_str)
                .transpose()?,
            limit: value.limit.unwrap_or(defaults.limit),
            offset: value.offset.unwrap_or(defaults.offset),
        })
    }
}

impl From<AuditLogQueryParams> for AuditLogQuery {
    fn from(value: AuditLogQueryParams) -> Self {
        let defaults = Self::default();
        Self {
            limit: value.limit.unwrap_or(defaults.limit),
            offset: value.offset.unwrap_or(defaults.offset),
            action: value.action,
            actor_id: value.actor_id,
        }
    }
}

impl From<RoleCatalogEntry> for RoleCatalogEntryResponse {
    fn from(value: RoleCatalogEntry) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            rank: value.rank,
            default_permissions: permission_names(&value.default_permissions),
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            assignment_id: value.assignment_id.to_string(),
            effective_permissions: permission_names(&value.effective_permissions()),
            has_permission_overrides: value.permission_overrides.is_some(),
            actor_id: value.actor_id.to_string(),
            role: value.role.as_str().to_owned(),
            assigned_by: value.assigned_by.to_string(),
            assigned_at: format_timestamp(value.assigned_at),
            is_active: value.is_active,
            revoked_by: value.revoked_by.map(|actor_id| actor_id.to_string()),
            revoked_at: value.revoked_at.map(format_timestamp),
        }
    }
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id,
            actor_id: value.actor_id,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: format_timestamp(value.created_at),
        }
    }
}
