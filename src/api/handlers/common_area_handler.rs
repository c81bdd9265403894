//! Common area handlers (`/api/areas-comunes`).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AreaStatus, CommonArea, CreateCommonArea, UpdateCommonArea};
use crate::errors::AppResult;
use crate::types::{CountResponse, Created, NoContent, TextQuery};

/// Capacity threshold, exclusive
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CapacityQuery {
    #[serde(default)]
    pub capacidad_minima: i32,
}

/// Create common area routes
pub fn common_area_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_areas).post(create_area))
        .route("/activas", get(active_areas))
        .route("/buscar", get(search_areas))
        .route("/estado/:status", get(areas_by_status))
        .route("/estado/:status/conteo", get(count_by_status))
        .route("/:id", get(get_area).put(update_area).delete(delete_area))
}

#[utoipa::path(
    get,
    path = "/api/areas-comunes",
    tag = "Common areas",
    responses((status = 200, description = "All common areas by name", body = Vec<CommonArea>))
)]
pub async fn list_areas(State(state): State<AppState>) -> AppResult<Json<Vec<CommonArea>>> {
    Ok(Json(state.common_area_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/areas-comunes/{id}",
    tag = "Common areas",
    params(("id" = i64, Path, description = "Common area ID")),
    responses(
        (status = 200, description = "Common area found", body = CommonArea),
        (status = 404, description = "Common area not found")
    )
)]
pub async fn get_area(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CommonArea>> {
    Ok(Json(state.common_area_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/areas-comunes",
    tag = "Common areas",
    request_body = CreateCommonArea,
    responses(
        (status = 201, description = "Common area created", body = CommonArea),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_area(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCommonArea>,
) -> AppResult<Created<CommonArea>> {
    Ok(Created(state.common_area_service.create(payload).await?))
}

/// Update capacity, description, hours and status
#[utoipa::path(
    put,
    path = "/api/areas-comunes/{id}",
    tag = "Common areas",
    params(("id" = i64, Path, description = "Common area ID")),
    request_body = UpdateCommonArea,
    responses(
        (status = 200, description = "Common area updated", body = CommonArea),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Common area not found")
    )
)]
pub async fn update_area(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCommonArea>,
) -> AppResult<Json<CommonArea>> {
    Ok(Json(state.common_area_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/areas-comunes/{id}",
    tag = "Common areas",
    params(("id" = i64, Path, description = "Common area ID")),
    responses(
        (status = 204, description = "Common area deleted"),
        (status = 404, description = "Common area not found")
    )
)]
pub async fn delete_area(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.common_area_service.delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/areas-comunes/activas",
    tag = "Common areas",
    params(CapacityQuery),
    responses((status = 200, description = "Active areas above the capacity", body = Vec<CommonArea>))
)]
pub async fn active_areas(
    State(state): State<AppState>,
    Query(query): Query<CapacityQuery>,
) -> AppResult<Json<Vec<CommonArea>>> {
    Ok(Json(
        state
            .common_area_service
            .active_with_capacity_above(query.capacidad_minima)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/areas-comunes/estado/{status}",
    tag = "Common areas",
    params(
        ("status" = AreaStatus, Path, description = "Area status"),
        CapacityQuery
    ),
    responses(
        (status = 200, description = "Areas with the status above the capacity", body = Vec<CommonArea>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn areas_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
    Query(query): Query<CapacityQuery>,
) -> AppResult<Json<Vec<CommonArea>>> {
    let status = status.parse::<AreaStatus>()?;
    Ok(Json(
        state
            .common_area_service
            .by_status_with_capacity_above(status, query.capacidad_minima)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/areas-comunes/buscar",
    tag = "Common areas",
    params(TextQuery),
    responses(
        (status = 200, description = "Areas matching name or description", body = Vec<CommonArea>),
        (status = 400, description = "Empty search text")
    )
)]
pub async fn search_areas(
    State(state): State<AppState>,
    Query(query): Query<TextQuery>,
) -> AppResult<Json<Vec<CommonArea>>> {
    Ok(Json(state.common_area_service.search(&query.texto).await?))
}

#[utoipa::path(
    get,
    path = "/api/areas-comunes/estado/{status}/conteo",
    tag = "Common areas",
    params(("status" = AreaStatus, Path, description = "Area status")),
    responses(
        (status = 200, description = "Number of areas with the status", body = CountResponse),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn count_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<CountResponse>> {
    let status = status.parse::<AreaStatus>()?;
    let count = state.common_area_service.count_by_status(status).await?;
    Ok(Json(count.into()))
}
