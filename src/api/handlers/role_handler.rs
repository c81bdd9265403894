//! Role handlers (`/api/roles`).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CreateRole, PatchRole, Role, RoleStatistics, UpdateRole, UserResponse};
use crate::errors::AppResult;
use crate::types::{CountResponse, Created, DateRangeQuery, NoContent};

/// Description search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DescriptionQuery {
    pub descripcion: String,
}

/// Minimum active users
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MinUsersQuery {
    #[serde(default)]
    pub minimo: u64,
}

/// Replacement permission list
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PermissionsRequest {
    #[schema(example = json!(["READ_PROFILE", "UPDATE_PROFILE"]))]
    pub permissions: Vec<String>,
}

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/activos", get(list_active_roles))
        .route("/inactivos", get(list_inactive_roles))
        .route("/buscar", get(search_by_description))
        .route("/sin-usuarios", get(roles_without_users))
        .route("/con-usuarios", get(roles_with_min_users))
        .route("/fecha-creacion", get(roles_created_between))
        .route("/estadisticas", get(statistics))
        .route("/inicializar", post(initialize_default_roles))
        .route("/nombre/:name", get(get_by_name))
        .route("/nombre-ignore-case/:name", get(get_by_name_ignore_case))
        .route("/existe/:name", get(exists_by_name))
        .route("/existe-activo/:name", get(exists_active_by_name))
        .route("/permiso/:permission", get(roles_with_permission))
        .route("/usuario/:user_id", get(roles_of_user))
        .route(
            "/:id",
            get(get_role)
                .put(update_role)
                .patch(patch_role)
                .delete(delete_role),
        )
        .route("/:id/reactivar", put(reactivate_role))
        .route("/:id/permisos", get(get_permissions).put(set_permissions))
        .route(
            "/:id/permisos/:permission",
            post(add_permission).delete(remove_permission),
        )
        .route("/:id/tiene-permiso/:permission", get(has_permission))
        .route("/:id/usuarios", get(users_with_role))
        .route("/:id/usuarios/conteo", get(count_users_with_role))
        .route("/:id/puede-eliminar", get(can_delete))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "Roles",
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Validation error or unknown permission"),
        (status = 409, description = "Role name already exists")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRole>,
) -> AppResult<Created<Role>> {
    Ok(Created(state.role_service.create_role(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses((status = 200, description = "All roles", body = Vec<Role>))
)]
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.list_roles().await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.get_role(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role name already exists")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateRole>,
) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.update_role(id, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = PatchRole,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role name already exists")
    )
)]
pub async fn patch_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<PatchRole>,
) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.patch_role(id, payload).await?))
}

/// Deactivate a role that has never been assigned
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deactivated"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role is protected or has assignments")
    )
)]
pub async fn delete_role(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<NoContent> {
    state.role_service.delete_role(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}/reactivar",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role reactivated", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn reactivate_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.reactivate_role(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/nombre/{name}",
    tag = "Roles",
    params(("name" = String, Path, description = "Role name, uppercased before lookup")),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.get_by_name(&name).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/nombre-ignore-case/{name}",
    tag = "Roles",
    params(("name" = String, Path, description = "Role name, any case")),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_by_name_ignore_case(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.get_by_name_ignore_case(&name).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/activos",
    tag = "Roles",
    responses((status = 200, description = "Active roles, by name", body = Vec<Role>))
)]
pub async fn list_active_roles(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.list_active_roles().await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/inactivos",
    tag = "Roles",
    responses((status = 200, description = "Inactive roles", body = Vec<Role>))
)]
pub async fn list_inactive_roles(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.list_inactive_roles().await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/buscar",
    tag = "Roles",
    params(DescriptionQuery),
    responses((status = 200, description = "Active roles matching the description", body = Vec<Role>))
)]
pub async fn search_by_description(
    State(state): State<AppState>,
    Query(query): Query<DescriptionQuery>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(
        state
            .role_service
            .search_by_description(&query.descripcion)
            .await?,
    ))
}

/// Active roles whose permission text contains the value
#[utoipa::path(
    get,
    path = "/api/roles/permiso/{permission}",
    tag = "Roles",
    params(("permission" = String, Path, description = "Permission text")),
    responses((status = 200, description = "Matching roles", body = Vec<Role>))
)]
pub async fn roles_with_permission(
    State(state): State<AppState>,
    Path(permission): Path<String>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.roles_with_permission(&permission).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/permisos",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Permission list", body = Vec<String>),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_permissions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.role_service.get_permissions(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}/permisos",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = PermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced", body = Role),
        (status = 400, description = "Unknown permission"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn set_permissions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<PermissionsRequest>,
) -> AppResult<Json<Role>> {
    Ok(Json(
        state
            .role_service
            .set_permissions(id, payload.permissions)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}/permisos/{permission}",
    tag = "Roles",
    params(
        ("id" = i64, Path, description = "Role ID"),
        ("permission" = String, Path, description = "Permission to add")
    ),
    responses(
        (status = 200, description = "Permission added", body = Role),
        (status = 400, description = "Unknown permission"),
        (status = 409, description = "Role already has the permission")
    )
)]
pub async fn add_permission(
    State(state): State<AppState>,
    Path((id, permission)): Path<(i64, String)>,
) -> AppResult<Json<Role>> {
    Ok(Json(state.role_service.add_permission(id, &permission).await?))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}/permisos/{permission}",
    tag = "Roles",
    params(
        ("id" = i64, Path, description = "Role ID"),
        ("permission" = String, Path, description = "Permission to remove")
    ),
    responses(
        (status = 200, description = "Permission removed", body = Role),
        (status = 404, description = "Role does not have the permission")
    )
)]
pub async fn remove_permission(
    State(state): State<AppState>,
    Path((id, permission)): Path<(i64, String)>,
) -> AppResult<Json<Role>> {
    Ok(Json(
        state
            .role_service
            .remove_permission(id, &permission)
            .await?,
    ))
}

/// Exact permission membership
#[utoipa::path(
    get,
    path = "/api/roles/{id}/tiene-permiso/{permission}",
    tag = "Roles",
    params(
        ("id" = i64, Path, description = "Role ID"),
        ("permission" = String, Path, description = "Permission")
    ),
    responses((status = 200, description = "Whether the role has the permission", body = bool))
)]
pub async fn has_permission(
    State(state): State<AppState>,
    Path((id, permission)): Path<(i64, String)>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.role_service.has_permission(id, &permission).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/usuarios",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses((status = 200, description = "Active users holding the role", body = Vec<UserResponse>))
)]
pub async fn users_with_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.role_service.users_with_role(id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/usuarios/conteo",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses((status = 200, description = "Active users holding the role", body = CountResponse))
)]
pub async fn count_users_with_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CountResponse>> {
    let count = state.role_service.count_users_with_role(id).await?;
    Ok(Json(count.into()))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/puede-eliminar",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses((status = 200, description = "Whether the role may be deleted", body = bool))
)]
pub async fn can_delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    Ok(Json(state.role_service.can_delete(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/usuario/{user_id}",
    tag = "Roles",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active roles of the user", body = Vec<Role>),
        (status = 404, description = "User not found")
    )
)]
pub async fn roles_of_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.roles_of_user(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/sin-usuarios",
    tag = "Roles",
    responses((status = 200, description = "Roles nobody holds", body = Vec<Role>))
)]
pub async fn roles_without_users(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.roles_without_users().await?))
}

/// Roles with at least `minimo` active users, most users first
#[utoipa::path(
    get,
    path = "/api/roles/con-usuarios",
    tag = "Roles",
    params(MinUsersQuery),
    responses((status = 200, description = "Roles in use", body = Vec<Role>))
)]
pub async fn roles_with_min_users(
    State(state): State<AppState>,
    Query(query): Query<MinUsersQuery>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.roles_with_min_users(query.minimo).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/fecha-creacion",
    tag = "Roles",
    params(DateRangeQuery),
    responses((status = 200, description = "Roles created in the range", body = Vec<Role>))
)]
pub async fn roles_created_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(
        state
            .role_service
            .roles_created_between(range.inicio, range.fin)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/roles/existe/{name}",
    tag = "Roles",
    params(("name" = String, Path, description = "Role name")),
    responses((status = 200, description = "Whether the name is taken", body = bool))
)]
pub async fn exists_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.role_service.exists_by_name(&name).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/existe-activo/{name}",
    tag = "Roles",
    params(("name" = String, Path, description = "Role name")),
    responses((status = 200, description = "Whether an active role has the name", body = bool))
)]
pub async fn exists_active_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.role_service.exists_active_by_name(&name).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/estadisticas",
    tag = "Roles",
    responses((status = 200, description = "Role counts", body = RoleStatistics))
)]
pub async fn statistics(State(state): State<AppState>) -> AppResult<Json<RoleStatistics>> {
    Ok(Json(state.role_service.statistics().await?))
}

/// Create the default roles that are missing
#[utoipa::path(
    post,
    path = "/api/roles/inicializar",
    tag = "Roles",
    responses((status = 200, description = "Roles created by this call", body = Vec<Role>))
)]
pub async fn initialize_default_roles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.role_service.initialize_default_roles().await?))
}
