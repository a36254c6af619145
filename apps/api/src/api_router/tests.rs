use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, ORIGIN, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use reelnet_application::{
    AuthorizationService, NewRoleAssignment, RoleAdminService, RoleAssignmentRepository,
};
use reelnet_core::ActorId;
use reelnet_domain::{Permission, PermissionSet, Role};
use reelnet_infrastructure::{InMemoryAuditRepository, InMemoryRoleAssignmentRepository};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;

use super::build_router;

const FRONTEND_URL: &str = "http://localhost:3000";
const BOOTSTRAP_TOKEN: &str = "test-bootstrap-token";

struct TestApp {
    router: Router,
    repository: Arc<InMemoryRoleAssignmentRepository>,
}

impl TestApp {
    fn new() -> Self {
        let repository = Arc::new(InMemoryRoleAssignmentRepository::new());
        let audit_repository = Arc::new(InMemoryAuditRepository::new());
        let authorization_service = AuthorizationService::new(repository.clone());
        let role_admin_service = RoleAdminService::new(
            authorization_service.clone(),
            repository.clone(),
            audit_repository.clone(),
            audit_repository,
        );

        let state = AppState {
            authorization_service,
            role_admin_service,
            frontend_url: FRONTEND_URL.to_owned(),
            bootstrap_token: BOOTSTRAP_TOKEN.to_owned(),
        };
        let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
        let router = build_router(state, FRONTEND_URL, session_layer)
            .unwrap_or_else(|_| unreachable!());

        Self { router, repository }
    }

    async fn seed(&self, actor_id: &str, role: Role, overrides: Option<PermissionSet>) {
        let saved = self
            .repository
            .upsert_active_assignment(NewRoleAssignment {
                actor_id: actor(actor_id),
                role,
                permission_overrides: overrides,
                assigned_by: actor("seed"),
            })
            .await;
        assert!(saved.is_ok());
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|error| match error {})
    }

    /// Signs in through the bootstrap token and returns the session cookie.
    async fn login(&self, actor_id: &str) -> String {
        let response = self
            .send(request(
                Method::POST,
                "/auth/bootstrap",
                None,
                Some(json!({ "actor_id": actor_id, "token": BOOTSTRAP_TOKEN })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(ToOwned::to_owned)
            .unwrap_or_default()
    }
}

fn actor(value: &str) -> ActorId {
    ActorId::new(value).unwrap_or_else(|_| unreachable!())
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ORIGIN, FRONTEND_URL);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }

    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).unwrap_or_else(|_| unreachable!())
}

async fn read_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();

    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();

    let response = app
        .send(request(Method::GET, "/health", None, None))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "reelnet-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn anonymous_requests_are_denied_with_no_session() {
    let app = TestApp::new();

    let response = app
        .send(request(Method::GET, "/api/security/roles", None, None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await, json!({ "error": "no_session" }));
}

#[tokio::test]
async fn bootstrap_rejects_invalid_token() {
    let app = TestApp::new();

    let response = app
        .send(request(
            Method::POST,
            "/auth/bootstrap",
            None,
            Some(json!({ "actor_id": "intruder", "token": "guess" })),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bootstrap_session_resolves_super_admin() {
    let app = TestApp::new();
    let cookie = app.login("operator").await;

    let response = app
        .send(request(Method::GET, "/auth/me", Some(&cookie), None))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["actor_id"], "operator");
    assert_eq!(body["role"], "super_admin");
    assert_eq!(
        body["permissions"].as_array().map(Vec::len),
        Some(Permission::all().len())
    );
}

#[tokio::test]
async fn revoked_actor_signs_back_in_as_user() {
    let app = TestApp::new();
    app.seed("moderator", Role::Moderator, None).await;
    let operator_cookie = app.login("operator").await;

    let revoked = app
        .send(request(
            Method::POST,
            "/api/security/role-revocations",
            Some(&operator_cookie),
            Some(json!({ "actor_id": "moderator" })),
        ))
        .await;
    assert_eq!(revoked.status(), StatusCode::OK);

    let cookie = app.login("moderator").await;
    let response = app
        .send(request(Method::GET, "/auth/me", Some(&cookie), None))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["role"], "user");
    assert_eq!(body["permissions"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn moderator_cannot_list_assignments() {
    let app = TestApp::new();
    app.seed("festival-mod", Role::Moderator, None).await;
    let cookie = app.login("festival-mod").await;

    let response = app
        .send(request(
            Method::GET,
            "/api/security/role-assignments",
            Some(&cookie),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "insufficient_role", "requiredRole": "admin" })
    );
}

#[tokio::test]
async fn admin_without_manage_roles_cannot_assign() {
    let app = TestApp::new();
    app.seed("studio-admin", Role::Admin, None).await;
    let cookie = app.login("studio-admin").await;

    let response = app
        .send(request(
            Method::POST,
            "/api/security/role-assignments",
            Some(&cookie),
            Some(json!({ "actor_id": "member", "role": "premium_user" })),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "missing_permission", "requiredPermission": "manage_roles" })
    );
}

#[tokio::test]
async fn super_admin_assigns_reassigns_and_revokes() {
    let app = TestApp::new();
    let cookie = app.login("operator").await;

    let first = app
        .send(request(
            Method::POST,
            "/api/security/role-assignments",
            Some(&cookie),
            Some(json!({ "actor_id": "member", "role": "content_admin" })),
        ))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .send(request(
            Method::POST,
            "/api/security/role-assignments",
            Some(&cookie),
            Some(json!({
                "actor_id": "member",
                "role": "moderator",
                "permission_overrides": ["moderate_content", "view_reports"]
            })),
        ))
        .await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second_body = read_json(second).await;
    assert_eq!(second_body["has_permission_overrides"], true);
    assert_eq!(
        second_body["effective_permissions"],
        json!(["moderate_content", "view_reports"])
    );

    let listed = app
        .send(request(
            Method::GET,
            "/api/security/role-assignments?role=moderator",
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed = read_json(listed).await;
    let members: Vec<&Value> = listed
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry["actor_id"] == "member")
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["role"], "moderator");

    let history = app
        .send(request(
            Method::GET,
            "/api/security/role-assignments/member/history",
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(history.status(), StatusCode::OK);
    assert_eq!(
        read_json(history).await.as_array().map(Vec::len),
        Some(2)
    );

    let revoked = app
        .send(request(
            Method::POST,
            "/api/security/role-revocations",
            Some(&cookie),
            Some(json!({ "actor_id": "member" })),
        ))
        .await;
    assert_eq!(revoked.status(), StatusCode::OK);
    assert_eq!(read_json(revoked).await["revoked_by"], "operator");

    let revoked_again = app
        .send(request(
            Method::POST,
            "/api/security/role-revocations",
            Some(&cookie),
            Some(json!({ "actor_id": "member" })),
        ))
        .await;
    assert_eq!(revoked_again.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json(revoked_again).await["error"],
        "no_active_assignment"
    );

    let audit_log = app
        .send(request(
            Method::GET,
            "/api/security/audit-log?action=security.role.assigned",
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(audit_log.status(), StatusCode::OK);
    assert_eq!(
        read_json(audit_log).await.as_array().map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn unknown_role_is_rejected_as_invalid() {
    let app = TestApp::new();
    let cookie = app.login("operator").await;

    let response = app
        .send(request(
            Method::POST,
            "/api/security/role-assignments",
            Some(&cookie),
            Some(json!({ "actor_id": "member", "role": "executive_producer" })),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_role");
}

#[tokio::test]
async fn mutations_without_origin_are_blocked() {
    let app = TestApp::new();
    let cookie = app.login("operator").await;

    let response = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/security/role-assignments")
                .header(COOKIE, cookie)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "actor_id": "member", "role": "user" }).to_string(),
                ))
                .unwrap_or_else(|_| unreachable!()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_check_reports_decision_for_session() {
    let app = TestApp::new();
    app.seed("festival-mod", Role::Moderator, None).await;
    let cookie = app.login("festival-mod").await;

    let denied = app
        .send(request(
            Method::POST,
            "/api/security/access-checks",
            Some(&cookie),
            Some(json!({ "kind": "permission", "value": "manage_roles" })),
        ))
        .await;
    assert_eq!(denied.status(), StatusCode::OK);
    assert_eq!(
        read_json(denied).await,
        json!({
            "allowed": false,
            "requirement": "permission:manage_roles",
            "reason": "missing_permission"
        })
    );

    let allowed = app
        .send(request(
            Method::POST,
            "/api/security/access-checks",
            Some(&cookie),
            Some(json!({ "kind": "minimum_role", "value": "moderator" })),
        ))
        .await;
    assert_eq!(read_json(allowed).await["allowed"], true);
}

#[tokio::test]
async fn audit_log_requires_view_reports() {
    let app = TestApp::new();
    app.seed("news-editor", Role::ContentAdmin, None).await;
    let cookie = app.login("news-editor").await;

    let response = app
        .send(request(
            Method::GET,
            "/api/security/audit-log",
            Some(&cookie),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "missing_permission", "requiredPermission": "view_reports" })
    );
}

#[tokio::test]
async fn actors_read_only_their_own_assignment() {
    let app = TestApp::new();
    app.seed("festival-mod", Role::Moderator, None).await;
    app.seed("critic", Role::PremiumUser, None).await;
    let cookie = app.login("festival-mod").await;

    let own = app
        .send(request(
            Method::GET,
            "/api/security/role-assignments/festival-mod",
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(own.status(), StatusCode::OK);
    assert_eq!(read_json(own).await["role"], "moderator");

    let other = app
        .send(request(
            Method::GET,
            "/api/security/role-assignments/critic",
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.login("operator").await;

    let logout = app
        .send(request(Method::POST, "/auth/logout", Some(&cookie), None))
        .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let me = app
        .send(request(Method::GET, "/auth/me", Some(&cookie), None))
        .await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}
