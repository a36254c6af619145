use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use reelnet_core::AppError;
use reelnet_domain::{AccessRequirement, Permission, Role};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

use cors::build_cors_layer;

/// Any authenticated actor satisfies the lowest rank.
const AUTHENTICATED: AccessRequirement = AccessRequirement::MinimumRole(Role::User);
const STAFF_DIRECTORY: AccessRequirement = AccessRequirement::MinimumRole(Role::Admin);
const AUDIT_REPORTS: AccessRequirement = AccessRequirement::Permission(Permission::ViewReports);

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    // Assignment writes and single-actor lookups are guarded inside the service.
    let session_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/security/roles",
            get(handlers::security::list_roles_handler),
        )
        .route(
            "/api/security/access-checks",
            post(handlers::security::access_check_handler),
        )
        .route(
            "/api/security/role-assignments",
            post(handlers::security::assign_role_handler),
        )
        .route(
            "/api/security/role-assignments/{actor_id}",
            get(handlers::security::current_assignment_handler),
        )
        .route(
            "/api/security/role-revocations",
            post(handlers::security::revoke_role_handler),
        );

    let staff_routes = Router::new()
        .route(
            "/api/security/role-assignments",
            get(handlers::security::list_role_assignments_handler),
        )
        .route(
            "/api/security/role-assignments/{actor_id}/history",
            get(handlers::security::assignment_history_handler),
        );

    let report_routes = Router::new().route(
        "/api/security/audit-log",
        get(handlers::security::list_audit_log_handler),
    );

    let protected_routes = guarded(session_routes, &app_state, AUTHENTICATED)
        .merge(guarded(staff_routes, &app_state, STAFF_DIRECTORY))
        .merge(guarded(report_routes, &app_state, AUDIT_REPORTS));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_session,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}

fn guarded(
    routes: Router<AppState>,
    app_state: &AppState,
    requirement: AccessRequirement,
) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_access,
        ))
        .layer(axum::Extension(requirement))
}

#[cfg(test)]
mod tests;
