//! Service request handlers (`/api/solicitudes`).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::Query as MultiQuery;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CreateServiceRequest, RequestKind, RequestStatus, ServiceRequest, UpdateServiceRequest,
};
use crate::errors::AppResult;
use crate::types::{Created, DateRangeQuery, NoContent, TextQuery};

/// Repeated `estados` and `tipos` parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestCriteria {
    #[serde(default)]
    pub estados: Vec<RequestStatus>,
    #[serde(default)]
    pub tipos: Vec<RequestKind>,
}

/// Create service request routes
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/por-fecha-creacion", get(created_between))
        .route("/por-fecha-resolucion", get(resolved_between))
        .route("/por-estados", get(by_statuses))
        .route("/por-tipos", get(by_kinds))
        .route("/buscar-descripcion", get(search_description))
        .route("/filtrar-estado-y-tipo", get(by_statuses_and_kinds))
        .route(
            "/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
}

#[utoipa::path(
    get,
    path = "/api/solicitudes",
    tag = "Service requests",
    responses((status = 200, description = "All requests", body = Vec<ServiceRequest>))
)]
pub async fn list_requests(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(state.request_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/{id}",
    tag = "Service requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request found", body = ServiceRequest),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ServiceRequest>> {
    Ok(Json(state.request_service.get(id).await?))
}

/// File a new request; it starts pending
#[utoipa::path(
    post,
    path = "/api/solicitudes",
    tag = "Service requests",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Request created", body = ServiceRequest),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> AppResult<Created<ServiceRequest>> {
    Ok(Created(state.request_service.create(payload).await?))
}

/// Change status and description
#[utoipa::path(
    put,
    path = "/api/solicitudes/{id}",
    tag = "Service requests",
    params(("id" = i64, Path, description = "Request ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Request updated", body = ServiceRequest),
        (status = 404, description = "Request not found")
    )
)]
pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceRequest>,
) -> AppResult<Json<ServiceRequest>> {
    Ok(Json(state.request_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/solicitudes/{id}",
    tag = "Service requests",
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.request_service.delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/por-fecha-creacion",
    tag = "Service requests",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Requests created in the range", body = Vec<ServiceRequest>),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn created_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(
        state
            .request_service
            .created_between(range.inicio, range.fin)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/por-fecha-resolucion",
    tag = "Service requests",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Requests resolved in the range", body = Vec<ServiceRequest>),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn resolved_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(
        state
            .request_service
            .resolved_between(range.inicio, range.fin)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/por-estados",
    tag = "Service requests",
    params(RequestCriteria),
    responses(
        (status = 200, description = "Requests in any of the statuses", body = Vec<ServiceRequest>),
        (status = 400, description = "Empty criteria list")
    )
)]
pub async fn by_statuses(
    State(state): State<AppState>,
    MultiQuery(criteria): MultiQuery<RequestCriteria>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(state.request_service.by_statuses(criteria.estados).await?))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/por-tipos",
    tag = "Service requests",
    params(RequestCriteria),
    responses(
        (status = 200, description = "Requests of any of the types", body = Vec<ServiceRequest>),
        (status = 400, description = "Empty criteria list")
    )
)]
pub async fn by_kinds(
    State(state): State<AppState>,
    MultiQuery(criteria): MultiQuery<RequestCriteria>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(state.request_service.by_kinds(criteria.tipos).await?))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/buscar-descripcion",
    tag = "Service requests",
    params(TextQuery),
    responses(
        (status = 200, description = "Requests whose description contains the text", body = Vec<ServiceRequest>),
        (status = 400, description = "Empty search text")
    )
)]
pub async fn search_description(
    State(state): State<AppState>,
    Query(query): Query<TextQuery>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(
        state
            .request_service
            .search_description(&query.texto)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/filtrar-estado-y-tipo",
    tag = "Service requests",
    params(RequestCriteria),
    responses(
        (status = 200, description = "Requests matching both lists", body = Vec<ServiceRequest>),
        (status = 400, description = "Empty criteria list")
    )
)]
pub async fn by_statuses_and_kinds(
    State(state): State<AppState>,
    MultiQuery(criteria): MultiQuery<RequestCriteria>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    Ok(Json(
        state
            .request_service
            .by_statuses_and_kinds(criteria.estados, criteria.tipos)
            .await?,
    ))
}
