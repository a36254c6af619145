mod common;
mod security;

pub use common::{CurrentActorResponse, HealthResponse};
pub use security::{
    AccessCheckRequest, AccessCheckResponse, AssignRoleRequest, AuditLogEntryResponse,
    AuditLogQueryParams, RevokeRoleRequest, RoleAssignmentListQuery, RoleAssignmentResponse,
    RoleCatalogEntryResponse, permission_overrides_from_transport,
};

#[cfg(test)]
mod tests {
    use super::{
        AccessCheckRequest, AccessCheckResponse, AssignRoleRequest, AuditLogEntryResponse,
        CurrentActorResponse, HealthResponse, RevokeRoleRequest, RoleAssignmentResponse,
        RoleCatalogEntryResponse,
    };

    use crate::error::{AccessDeniedResponse, ErrorResponse};
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AssignRoleRequest::export(&config)?;
        RevokeRoleRequest::export(&config)?;
        AccessCheckRequest::export(&config)?;
        AccessCheckResponse::export(&config)?;
        RoleCatalogEntryResponse::export(&config)?;
        RoleAssignmentResponse::export(&config)?;
        AuditLogEntryResponse::export(&config)?;
        CurrentActorResponse::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        AccessDeniedResponse::export(&config)?;

        Ok(())
    }
}
