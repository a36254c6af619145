//! Domain entities and invariants for role-based access control.

#![forbid(unsafe_code)]

mod access;
mod audit;
mod catalog;
mod permission;
mod role;

pub use access::{
    AccessRequirement, ActorAccess, Decision, DenyCode, DenyReason, SessionContext, authorize,
    authorize_all,
};
pub use audit::AuditAction;
pub use catalog::{default_permissions, default_permissions_for, grants_by_default};
pub use permission::{Permission, PermissionSet};
pub use role::{InvalidRoleError, Role, role_is_at_least};
