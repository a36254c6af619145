//! Application services and ports.

#![forbid(unsafe_code)]

mod assignment_error;
mod audit_ports;
mod authorization_service;
mod role_admin_service;
mod role_assignment_ports;

pub use assignment_error::AssignmentError;
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use authorization_service::AuthorizationService;
pub use role_admin_service::{
    AssignRoleInput, ROLE_MANAGEMENT_REQUIREMENTS, RoleAdminService, RoleCatalogEntry,
};
pub use role_assignment_ports::{
    NewRoleAssignment, RoleAssignment, RoleAssignmentQuery, RoleAssignmentRepository,
};
