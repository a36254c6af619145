use super::*;

pub async fn access_check_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(payload): Json<AccessCheckRequest>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let requirement = AccessRequirement::try_from(payload)?;
    let decision = state
        .authorization_service
        .authorize(&session, requirement);

    Ok(Json(AccessCheckResponse::from_decision(
        requirement,
        decision,
    )))
}
