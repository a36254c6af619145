use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use reelnet_core::{AppError, UserIdentity};
use reelnet_domain::SessionContext;
use tower_sessions::Session;

use crate::dto::CurrentActorResponse;
use crate::error::ApiResult;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    Extension(identity): Extension<UserIdentity>,
    Extension(context): Extension<SessionContext>,
) -> ApiResult<Json<CurrentActorResponse>> {
    let access = context
        .actor()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(Json(CurrentActorResponse::from_identity_and_access(
        &identity, access,
    )))
}
