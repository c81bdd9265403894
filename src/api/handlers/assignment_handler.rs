//! Role assignment handlers (`/api/usuario-roles`).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    AssignmentPolicy, AssignmentStats, CreateAssignment, RoleAssignment, RoleIds,
    UpdateAssignment, UserIds,
};
use crate::errors::AppResult;
use crate::types::{CountResponse, Created, DateRangeQuery, NoContent};

/// Optional active flag; absent counts every row
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActiveQuery {
    pub activas: Option<bool>,
}

/// Create assignment routes
pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route("/activas", get(list_active))
        .route("/inactivas", get(list_inactive))
        .route("/fecha-creacion", get(created_between))
        .route("/fecha-modificacion", get(updated_between))
        .route("/estadisticas", get(statistics))
        .route("/conteo", get(count_assignments))
        .route("/politicas", get(policy))
        .route("/asignar/:user_id/:role_id", post(assign))
        .route(
            "/:id",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/:id/activar", put(activate))
        .route("/:id/desactivar", put(deactivate))
        .route("/usuario/:user_id", get(list_by_user))
        .route("/usuario/:user_id/activas", get(list_active_by_user))
        .route("/usuario/:user_id/historial", get(user_history))
        .route("/usuario/:user_id/conteo", get(count_roles_of_user))
        .route(
            "/usuario/:user_id/roles",
            post(assign_roles_to_user)
                .delete(unassign_roles_from_user)
                .put(replace_user_roles),
        )
        .route("/usuario/:user_id/tiene-rol/:role", get(user_has_role))
        .route("/usuario/:user_id/rol/:role_id", get(get_by_pair).delete(unassign))
        .route("/usuario/:user_id/rol/:role_id/activa", get(get_active_by_pair))
        .route("/usuario/:user_id/rol/:role_id/activar", put(activate_pair))
        .route("/usuario/:user_id/rol/:role_id/desactivar", put(deactivate_pair))
        .route("/usuario/:user_id/rol/:role_id/existe", get(exists))
        .route("/usuario/:user_id/rol/:role_id/existe-activa", get(exists_active))
        .route("/usuario/:user_id/rol/:role_id/puede-asignar", get(can_assign))
        .route("/usuario/:user_id/rol/:role_id/puede-desasignar", get(can_unassign))
        .route("/rol/:role_id", get(list_by_role))
        .route("/rol/:role_id/activas", get(list_active_by_role))
        .route("/rol/:role_id/historial", get(role_history))
        .route("/rol/:role_id/conteo", get(count_users_of_role))
        .route(
            "/rol/:role_id/usuarios",
            post(assign_role_to_users).delete(unassign_role_from_users),
        )
}

/// Assign a role to a user
#[utoipa::path(
    post,
    path = "/api/usuario-roles",
    tag = "Role assignments",
    request_body = CreateAssignment,
    responses(
        (status = 201, description = "Role assigned", body = RoleAssignment),
        (status = 404, description = "User or role not found"),
        (status = 409, description = "Assignment already active")
    )
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAssignment>,
) -> AppResult<Created<RoleAssignment>> {
    Ok(Created(state.assignment_service.create(payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/usuario-roles/asignar/{user_id}/{role_id}",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 201, description = "Role assigned", body = RoleAssignment),
        (status = 404, description = "User or role not found"),
        (status = 409, description = "Assignment already active")
    )
)]
pub async fn assign(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Created<RoleAssignment>> {
    Ok(Created(state.assignment_service.assign(user_id, role_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/{id}",
    tag = "Role assignments",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment found", body = RoleAssignment),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(state.assignment_service.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles",
    tag = "Role assignments",
    responses((status = 200, description = "All assignments", body = Vec<RoleAssignment>))
)]
pub async fn list_assignments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list().await?))
}

/// Change the active flag
#[utoipa::path(
    put,
    path = "/api/usuario-roles/{id}",
    tag = "Role assignments",
    params(("id" = i64, Path, description = "Assignment ID")),
    request_body = UpdateAssignment,
    responses(
        (status = 200, description = "Assignment updated", body = RoleAssignment),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Another active assignment exists for the pair")
    )
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateAssignment>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(state.assignment_service.update(id, payload).await?))
}

/// Remove the assignment row
#[utoipa::path(
    delete,
    path = "/api/usuario-roles/{id}",
    tag = "Role assignments",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.assignment_service.delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Assignment of the pair", body = RoleAssignment),
        (status = 404, description = "No assignment for the pair")
    )
)]
pub async fn get_by_pair(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(state.assignment_service.get_by_pair(user_id, role_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/activa",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Active assignment of the pair", body = RoleAssignment),
        (status = 404, description = "No active assignment for the pair")
    )
)]
pub async fn get_active_by_pair(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(
        state
            .assignment_service
            .get_active_by_pair(user_id, role_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Assignments of the user", body = Vec<RoleAssignment>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list_by_user(user_id, false).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/activas",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active assignments of the user", body = Vec<RoleAssignment>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_active_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list_by_user(user_id, true).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/rol/{role_id}",
    tag = "Role assignments",
    params(("role_id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Assignments of the role", body = Vec<RoleAssignment>),
        (status = 404, description = "Role not found")
    )
)]
pub async fn list_by_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list_by_role(role_id, false).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/rol/{role_id}/activas",
    tag = "Role assignments",
    params(("role_id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Active assignments of the role, newest first", body = Vec<RoleAssignment>),
        (status = 404, description = "Role not found")
    )
)]
pub async fn list_active_by_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list_by_role(role_id, true).await?))
}

#[utoipa::path(
    put,
    path = "/api/usuario-roles/{id}/activar",
    tag = "Role assignments",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment activated", body = RoleAssignment),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Another active assignment exists for the pair")
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(state.assignment_service.activate(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/usuario-roles/{id}/desactivar",
    tag = "Role assignments",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deactivated", body = RoleAssignment),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(state.assignment_service.deactivate(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/activar",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Assignment activated", body = RoleAssignment),
        (status = 404, description = "No assignment for the pair")
    )
)]
pub async fn activate_pair(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(state.assignment_service.activate_pair(user_id, role_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/desactivar",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Assignment deactivated", body = RoleAssignment),
        (status = 404, description = "No active assignment for the pair")
    )
)]
pub async fn deactivate_pair(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<RoleAssignment>> {
    Ok(Json(
        state
            .assignment_service
            .deactivate_pair(user_id, role_id)
            .await?,
    ))
}

/// Remove a role from a user, keeping the last administrator
#[utoipa::path(
    delete,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role unassigned"),
        (status = 404, description = "No active assignment for the pair"),
        (status = 409, description = "Role cannot be removed")
    )
)]
pub async fn unassign(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<NoContent> {
    state.assignment_service.unassign(user_id, role_id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/activas",
    tag = "Role assignments",
    responses((status = 200, description = "Active assignments", body = Vec<RoleAssignment>))
)]
pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list_active().await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/inactivas",
    tag = "Role assignments",
    responses((status = 200, description = "Inactive assignments", body = Vec<RoleAssignment>))
)]
pub async fn list_inactive(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.list_inactive().await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/fecha-creacion",
    tag = "Role assignments",
    params(DateRangeQuery),
    responses((status = 200, description = "Assignments created in the range", body = Vec<RoleAssignment>))
)]
pub async fn created_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .created_between(range.inicio, range.fin)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/fecha-modificacion",
    tag = "Role assignments",
    params(DateRangeQuery),
    responses((status = 200, description = "Assignments modified in the range", body = Vec<RoleAssignment>))
)]
pub async fn updated_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .updated_between(range.inicio, range.fin)
            .await?,
    ))
}

/// Whether the user actively holds the role, given by id or by name
#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/tiene-rol/{role}",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role" = String, Path, description = "Role ID or role name")
    ),
    responses((status = 200, description = "Whether the user holds the role", body = bool))
)]
pub async fn user_has_role(
    State(state): State<AppState>,
    Path((user_id, role)): Path<(i64, String)>,
) -> AppResult<Json<bool>> {
    let holds = match role.parse::<i64>() {
        Ok(role_id) => state.assignment_service.user_has_role(user_id, role_id).await?,
        Err(_) => {
            state
                .assignment_service
                .user_has_role_name(user_id, &role)
                .await?
        }
    };
    Ok(Json(holds))
}

/// Whether any assignment row exists for the pair
#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/existe",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses((status = 200, description = "Whether the pair was ever assigned", body = bool))
)]
pub async fn exists(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.assignment_service.exists(user_id, role_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/existe-activa",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses((status = 200, description = "Whether the pair is actively assigned", body = bool))
)]
pub async fn exists_active(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.assignment_service.exists_active(user_id, role_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/puede-asignar",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses((status = 200, description = "Whether the role can be assigned", body = bool))
)]
pub async fn can_assign(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.assignment_service.can_assign(user_id, role_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/rol/{role_id}/puede-desasignar",
    tag = "Role assignments",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses((status = 200, description = "Whether the role can be removed", body = bool))
)]
pub async fn can_unassign(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.assignment_service.can_unassign(user_id, role_id).await?))
}

/// Assign several roles at once; nothing is written if any item fails
#[utoipa::path(
    post,
    path = "/api/usuario-roles/usuario/{user_id}/roles",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = RoleIds,
    responses(
        (status = 200, description = "Created assignments", body = Vec<RoleAssignment>),
        (status = 404, description = "User not found"),
        (status = 409, description = "A role cannot be assigned")
    )
)]
pub async fn assign_roles_to_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoleIds>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .assign_roles_to_user(user_id, payload.role_ids)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/usuario-roles/usuario/{user_id}/roles",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = RoleIds,
    responses(
        (status = 200, description = "Deactivated assignments", body = Vec<RoleAssignment>),
        (status = 409, description = "A role cannot be removed")
    )
)]
pub async fn unassign_roles_from_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoleIds>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .unassign_roles_from_user(user_id, payload.role_ids)
            .await?,
    ))
}

/// Make the user's active roles match the list
#[utoipa::path(
    put,
    path = "/api/usuario-roles/usuario/{user_id}/roles",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = RoleIds,
    responses(
        (status = 200, description = "Active assignments after the change", body = Vec<RoleAssignment>),
        (status = 404, description = "User not found"),
        (status = 409, description = "A role cannot be assigned")
    )
)]
pub async fn replace_user_roles(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoleIds>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .replace_user_roles(user_id, payload.role_ids)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/usuario-roles/rol/{role_id}/usuarios",
    tag = "Role assignments",
    params(("role_id" = i64, Path, description = "Role ID")),
    request_body = UserIds,
    responses(
        (status = 200, description = "Created assignments", body = Vec<RoleAssignment>),
        (status = 404, description = "Role not found"),
        (status = 409, description = "A user cannot receive the role")
    )
)]
pub async fn assign_role_to_users(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UserIds>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .assign_role_to_users(role_id, payload.user_ids)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/usuario-roles/rol/{role_id}/usuarios",
    tag = "Role assignments",
    params(("role_id" = i64, Path, description = "Role ID")),
    request_body = UserIds,
    responses(
        (status = 200, description = "Deactivated assignments", body = Vec<RoleAssignment>),
        (status = 404, description = "Role not found"),
        (status = 409, description = "The role cannot be removed from a user")
    )
)]
pub async fn unassign_role_from_users(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UserIds>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(
        state
            .assignment_service
            .unassign_role_from_users(role_id, payload.user_ids)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/conteo",
    tag = "Role assignments",
    params(ActiveQuery),
    responses((status = 200, description = "Number of assignments", body = CountResponse))
)]
pub async fn count_assignments(
    State(state): State<AppState>,
    Query(query): Query<ActiveQuery>,
) -> AppResult<Json<CountResponse>> {
    let count = state.assignment_service.count(query.activas).await?;
    Ok(Json(count.into()))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/conteo",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    responses((status = 200, description = "Active roles of the user", body = CountResponse))
)]
pub async fn count_roles_of_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .assignment_service
        .count_active_roles_of_user(user_id)
        .await?;
    Ok(Json(count.into()))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/rol/{role_id}/conteo",
    tag = "Role assignments",
    params(("role_id" = i64, Path, description = "Role ID")),
    responses((status = 200, description = "Active users of the role", body = CountResponse))
)]
pub async fn count_users_of_role(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> AppResult<Json<CountResponse>> {
    let count = state
        .assignment_service
        .count_active_users_of_role(role_id)
        .await?;
    Ok(Json(count.into()))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/estadisticas",
    tag = "Role assignments",
    responses((status = 200, description = "Assignment counts", body = AssignmentStats))
)]
pub async fn statistics(State(state): State<AppState>) -> AppResult<Json<AssignmentStats>> {
    Ok(Json(state.assignment_service.statistics().await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/usuario/{user_id}/historial",
    tag = "Role assignments",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Every assignment of the user, newest first", body = Vec<RoleAssignment>),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.user_history(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuario-roles/rol/{role_id}/historial",
    tag = "Role assignments",
    params(("role_id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Every assignment of the role, newest first", body = Vec<RoleAssignment>),
        (status = 404, description = "Role not found")
    )
)]
pub async fn role_history(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> AppResult<Json<Vec<RoleAssignment>>> {
    Ok(Json(state.assignment_service.role_history(role_id).await?))
}

/// Reference limits published for clients
#[utoipa::path(
    get,
    path = "/api/usuario-roles/politicas",
    tag = "Role assignments",
    responses((status = 200, description = "Assignment policy", body = AssignmentPolicy))
)]
pub async fn policy(State(state): State<AppState>) -> Json<AssignmentPolicy> {
    Json(state.assignment_service.policy())
}
