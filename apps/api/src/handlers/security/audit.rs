use super::*;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<AuditLogQueryParams>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .role_admin_service
        .list_audit_log(&session, query.into())
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
