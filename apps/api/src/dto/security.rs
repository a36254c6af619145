use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

pub use conversions::permission_overrides_from_transport;

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub actor_id: String,
    pub role: String,
    /// Granted permission names replacing the role defaults.
    #[serde(default)]
    pub permission_overrides: Option<Vec<String>>,
}

/// Incoming payload for role revocation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/revoke-role-request.ts"
)]
pub struct RevokeRoleRequest {
    pub actor_id: String,
}

/// Incoming payload for evaluating one access requirement.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-check-request.ts"
)]
pub struct AccessCheckRequest {
    /// Either `minimum_role` or `permission`.
    pub kind: String,
    pub value: String,
}

/// Outcome of an access check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-check-response.ts"
)]
pub struct AccessCheckResponse {
    pub allowed: bool,
    pub requirement: String,
    pub reason: Option<String>,
}

/// Query parameters for listing active assignments.
#[derive(Debug, Default, Deserialize)]
pub struct RoleAssignmentListQuery {
    pub role: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Query parameters for listing audit entries.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQueryParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub actor_id: Option<String>,
}

/// API representation of a cataloged role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-catalog-entry-response.ts"
)]
pub struct RoleCatalogEntryResponse {
    pub role: String,
    pub rank: u8,
    pub default_permissions: Vec<String>,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub assignment_id: String,
    pub actor_id: String,
    pub role: String,
    pub effective_permissions: Vec<String>,
    pub has_permission_overrides: bool,
    pub assigned_by: String,
    pub assigned_at: String,
    pub is_active: bool,
    pub revoked_by: Option<String>,
    pub revoked_at: Option<String>,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub actor_id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}
