use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use reelnet_core::{ActorId, AppError, UserIdentity};
use reelnet_domain::Role;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub actor_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub token: String,
}

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        warn!(actor_id = %payload.actor_id, "bootstrap login rejected");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let actor_id = ActorId::new(payload.actor_id)?;
    let display_name = payload
        .display_name
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| actor_id.to_string());
    let identity = UserIdentity::new(actor_id, display_name, payload.email);

    let role = state
        .role_admin_service
        .bootstrap_operator(&identity)
        .await?
        .map_or(Role::User, |assignment| assignment.role);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(
        actor_id = %identity.actor_id(),
        role = %role,
        "bootstrap session established"
    );

    Ok(StatusCode::NO_CONTENT)
}
