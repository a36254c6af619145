use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleCatalogEntryResponse>>> {
    let roles = state
        .role_admin_service
        .role_catalog()
        .into_iter()
        .map(RoleCatalogEntryResponse::from)
        .collect();

    Ok(Json(roles))
}
