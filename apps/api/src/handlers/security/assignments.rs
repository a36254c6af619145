use super::*;

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<RoleAssignmentListQuery>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .role_admin_service
        .list_active_assignments(&session, query.try_into()?)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleAssignmentResponse>)> {
    let input = AssignRoleInput {
        target_actor_id: ActorId::new(payload.actor_id)?,
        role: payload.role,
        permission_overrides: permission_overrides_from_transport(payload.permission_overrides)?,
    };

    let assignment = state
        .role_admin_service
        .assign_role(&session, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleAssignmentResponse::from(assignment)),
    ))
}

pub async fn revoke_role_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(payload): Json<RevokeRoleRequest>,
) -> ApiResult<Json<RoleAssignmentResponse>> {
    let target_actor_id = ActorId::new(payload.actor_id)?;
    let revoked = state
        .role_admin_service
        .revoke_role(&session, &target_actor_id)
        .await?;

    Ok(Json(RoleAssignmentResponse::from(revoked)))
}

pub async fn current_assignment_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(actor_id): Path<String>,
) -> ApiResult<Json<Option<RoleAssignmentResponse>>> {
    let actor_id = ActorId::new(actor_id)?;
    let assignment = state
        .role_admin_service
        .current_assignment(&session, &actor_id)
        .await?;

    Ok(Json(assignment.map(RoleAssignmentResponse::from)))
}

pub async fn assignment_history_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(actor_id): Path<String>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let actor_id = ActorId::new(actor_id)?;
    let history = state
        .role_admin_service
        .assignment_history(&session, &actor_id)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(history))
}
