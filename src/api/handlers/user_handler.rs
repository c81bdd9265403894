//! User handlers (`/api/usuarios`).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    ChangePassword, CreateUser, PatchUser, ResetPassword, UpdateUser, User, UserResponse,
    UserStatistics,
};
use crate::errors::AppResult;
use crate::types::{Created, DateRangeQuery, NoContent};

/// Name search parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    /// Substring of "first_names last_names", any case
    pub busqueda: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/activos", get(list_active_users))
        .route("/inactivos", get(list_inactive_users))
        .route("/buscar", get(search_users))
        .route("/sin-roles", get(users_without_roles))
        .route("/multiples-roles", get(users_with_multiple_roles))
        .route("/fecha-creacion", get(users_created_between))
        .route("/estadisticas", get(statistics))
        .route("/documento/:document", get(get_by_document))
        .route("/email/:email", get(get_by_email))
        .route("/rol/:role_name", get(users_by_role))
        .route("/existe/documento/:document", get(exists_by_document))
        .route("/existe/email/:email", get(exists_by_email))
        .route(
            "/:id",
            get(get_user)
                .put(update_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .route("/:id/reactivar", put(reactivate_user))
        .route("/:id/puede-eliminar", get(can_delete))
        .route("/:id/password", put(change_password))
        .route("/:id/password/restablecer", put(reset_password))
}

fn to_responses(users: Vec<User>) -> Json<Vec<UserResponse>> {
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Document number or email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.create_user(payload).await?;
    Ok(Created(UserResponse::from(user)))
}

/// List every user
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Users",
    responses((status = 200, description = "All users", body = Vec<UserResponse>))
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.list_users().await?))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Replace a user
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Document number or email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the provided fields of a user
#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = PatchUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Document number or email already registered")
    )
)]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<PatchUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.patch_user(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Deactivate a user
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}

/// Reactivate a deactivated user
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}/reactivar",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User reactivated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn reactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.reactivate_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/documento/{document}",
    tag = "Users",
    params(("document" = String, Path, description = "Document number")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_by_document(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_by_document(&document).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_by_email(&email).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Active users, by name
#[utoipa::path(
    get,
    path = "/api/usuarios/activos",
    tag = "Users",
    responses((status = 200, description = "Active users", body = Vec<UserResponse>))
)]
pub async fn list_active_users(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.list_active_users().await?))
}

/// Inactive users, most recently changed first
#[utoipa::path(
    get,
    path = "/api/usuarios/inactivos",
    tag = "Users",
    responses((status = 200, description = "Inactive users", body = Vec<UserResponse>))
)]
pub async fn list_inactive_users(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.list_inactive_users().await?))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/buscar",
    tag = "Users",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 400, description = "Empty search term")
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.search_users(&query.busqueda).await?))
}

/// Active users holding the role
#[utoipa::path(
    get,
    path = "/api/usuarios/rol/{role_name}",
    tag = "Users",
    params(("role_name" = String, Path, description = "Role name, any case")),
    responses((status = 200, description = "Users with the role", body = Vec<UserResponse>))
)]
pub async fn users_by_role(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.users_by_role(&role_name).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/sin-roles",
    tag = "Users",
    responses((status = 200, description = "Users without active roles", body = Vec<UserResponse>))
)]
pub async fn users_without_roles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.users_without_roles().await?))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/multiples-roles",
    tag = "Users",
    responses((status = 200, description = "Users with two or more active roles", body = Vec<UserResponse>))
)]
pub async fn users_with_multiple_roles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.users_with_multiple_roles().await?))
}

/// Users created in the range, newest first
#[utoipa::path(
    get,
    path = "/api/usuarios/fecha-creacion",
    tag = "Users",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Users created in the range", body = Vec<UserResponse>),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn users_created_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .users_created_between(range.inicio, range.fin)
        .await?;
    Ok(to_responses(users))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/existe/documento/{document}",
    tag = "Users",
    params(("document" = String, Path, description = "Document number")),
    responses((status = 200, description = "Whether the document number is registered", body = bool))
)]
pub async fn exists_by_document(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.user_service.exists_by_document(&document).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/existe/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses((status = 200, description = "Whether the email is registered", body = bool))
)]
pub async fn exists_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.user_service.exists_by_email(&email).await?))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/{id}/puede-eliminar",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses((status = 200, description = "Whether the user may be deleted", body = bool))
)]
pub async fn can_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.user_service.can_delete(id).await?))
}

/// Change password, verifying the current one
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}/password",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = ChangePassword,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Current password is incorrect"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ChangePassword>,
) -> AppResult<NoContent> {
    state.user_service.change_password(id, payload).await?;
    Ok(NoContent)
}

#[utoipa::path(
    put,
    path = "/api/usuarios/{id}/password/restablecer",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = ResetPassword,
    responses(
        (status = 204, description = "Password reset"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ResetPassword>,
) -> AppResult<NoContent> {
    state.user_service.reset_password(id, payload).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/usuarios/estadisticas",
    tag = "Users",
    responses((status = 200, description = "User counts", body = UserStatistics))
)]
pub async fn statistics(State(state): State<AppState>) -> AppResult<Json<UserStatistics>> {
    Ok(Json(state.user_service.statistics().await?))
}
