use axum::extract::{Extension, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use reelnet_core::{AppError, UserIdentity};
use reelnet_domain::{AccessRequirement, SessionContext};
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the caller's session context and stores it in request extensions.
///
/// Authenticated requests also carry the stored [`UserIdentity`].
pub async fn resolve_session(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    let context = state
        .authorization_service
        .resolve_session(identity.as_ref())
        .await?;

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Rejects requests whose session does not meet the route requirement.
pub async fn require_access(
    State(state): State<AppState>,
    Extension(requirement): Extension<AccessRequirement>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let decision = match request.extensions().get::<SessionContext>() {
        Some(context) => state.authorization_service.authorize(context, requirement),
        None => state
            .authorization_service
            .authorize(&SessionContext::Anonymous, requirement),
    };
    decision.into_result()?;

    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.trim().trim_end_matches('/');
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer
            .strip_prefix(allowed_origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
