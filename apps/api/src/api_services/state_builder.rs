use std::sync::Arc;

use reelnet_application::{AuthorizationService, RoleAdminService};
use reelnet_infrastructure::{
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresRoleAssignmentRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let role_assignment_repository = Arc::new(PostgresRoleAssignmentRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool));

    let authorization_service = AuthorizationService::new(role_assignment_repository.clone());
    let role_admin_service = RoleAdminService::new(
        authorization_service.clone(),
        role_assignment_repository,
        audit_repository,
        audit_log_repository,
    );

    AppState {
        authorization_service,
        role_admin_service,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
