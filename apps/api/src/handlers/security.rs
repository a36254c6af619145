use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use reelnet_application::AssignRoleInput;
use reelnet_core::ActorId;
use reelnet_domain::{AccessRequirement, SessionContext};

use crate::dto::{
    AccessCheckRequest, AccessCheckResponse, AssignRoleRequest, AuditLogEntryResponse,
    AuditLogQueryParams, RevokeRoleRequest, RoleAssignmentListQuery, RoleAssignmentResponse,
    RoleCatalogEntryResponse, permission_overrides_from_transport,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod access;
mod assignments;
mod audit;
mod roles;

pub use access::access_check_handler;
pub use assignments::{
    assign_role_handler, assignment_history_handler, current_assignment_handler,
    list_role_assignments_handler, revoke_role_handler,
};
pub use audit::list_audit_log_handler;
pub use roles::list_roles_handler;
