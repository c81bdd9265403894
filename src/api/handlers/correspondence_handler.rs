//! Correspondence handlers (`/api/correspondencias`).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Correspondence, CorrespondenceInput, CorrespondenceKind, CorrespondenceStatus,
    DeliverCorrespondence,
};
use crate::errors::AppResult;
use crate::types::{Created, DateRangeQuery, NoContent};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CutoffQuery {
    /// Items received strictly before this instant
    pub antes_de: DateTime<Utc>,
}

/// Create correspondence routes
pub fn correspondence_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/pendientes", get(pending))
        .route("/antiguas", get(stale_pending))
        .route("/rango-fechas", get(received_between))
        .route("/destinatario/:user_id", get(by_recipient))
        .route("/destinatario/:user_id/pendientes", get(pending_for_recipient))
        .route("/retirado-por/:user_id", get(picked_up_by))
        .route("/registrado-por/:user_id", get(recorded_by))
        .route("/estado/:status", get(by_status))
        .route("/tipo/:kind", get(by_kind))
        .route("/tipo/:kind/estado/:status", get(by_kind_and_status))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/entregar", put(mark_delivered))
}

/// Log a received item
#[utoipa::path(
    post,
    path = "/api/correspondencias",
    tag = "Correspondence",
    request_body = CorrespondenceInput,
    responses(
        (status = 201, description = "Item registered", body = Correspondence),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Referenced user or apartment not found")
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CorrespondenceInput>,
) -> AppResult<Created<Correspondence>> {
    Ok(Created(state.correspondence_service.create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias",
    tag = "Correspondence",
    responses((status = 200, description = "All items", body = Vec<Correspondence>))
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(state.correspondence_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/{id}",
    tag = "Correspondence",
    params(("id" = i64, Path, description = "Correspondence ID")),
    responses(
        (status = 200, description = "Item found", body = Correspondence),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Correspondence>> {
    Ok(Json(state.correspondence_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/correspondencias/{id}",
    tag = "Correspondence",
    params(("id" = i64, Path, description = "Correspondence ID")),
    request_body = CorrespondenceInput,
    responses(
        (status = 200, description = "Item updated", body = Correspondence),
        (status = 404, description = "Item or reference not found")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CorrespondenceInput>,
) -> AppResult<Json<Correspondence>> {
    Ok(Json(state.correspondence_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/correspondencias/{id}",
    tag = "Correspondence",
    params(("id" = i64, Path, description = "Correspondence ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.correspondence_service.delete(id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/destinatario/{user_id}",
    tag = "Correspondence",
    params(("user_id" = i64, Path, description = "Recipient user ID")),
    responses((status = 200, description = "Items addressed to the user", body = Vec<Correspondence>))
)]
pub async fn by_recipient(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(state.correspondence_service.by_recipient(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/destinatario/{user_id}/pendientes",
    tag = "Correspondence",
    params(("user_id" = i64, Path, description = "Recipient user ID")),
    responses((status = 200, description = "Pending items of the user, oldest first", body = Vec<Correspondence>))
)]
pub async fn pending_for_recipient(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(
        state
            .correspondence_service
            .pending_for_recipient(user_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/estado/{status}",
    tag = "Correspondence",
    params(("status" = CorrespondenceStatus, Path, description = "Item status")),
    responses(
        (status = 200, description = "Items with the status", body = Vec<Correspondence>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<Correspondence>>> {
    let status = status.parse::<CorrespondenceStatus>()?;
    Ok(Json(state.correspondence_service.by_status(status).await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/tipo/{kind}",
    tag = "Correspondence",
    params(("kind" = CorrespondenceKind, Path, description = "Item type")),
    responses(
        (status = 200, description = "Items of the type", body = Vec<Correspondence>),
        (status = 400, description = "Unknown type")
    )
)]
pub async fn by_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<Correspondence>>> {
    let kind = kind.parse::<CorrespondenceKind>()?;
    Ok(Json(state.correspondence_service.by_kind(kind).await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/tipo/{kind}/estado/{status}",
    tag = "Correspondence",
    params(
        ("kind" = CorrespondenceKind, Path, description = "Item type"),
        ("status" = CorrespondenceStatus, Path, description = "Item status")
    ),
    responses(
        (status = 200, description = "Items of the type with the status", body = Vec<Correspondence>),
        (status = 400, description = "Unknown type or status")
    )
)]
pub async fn by_kind_and_status(
    State(state): State<AppState>,
    Path((kind, status)): Path<(String, String)>,
) -> AppResult<Json<Vec<Correspondence>>> {
    let kind = kind.parse::<CorrespondenceKind>()?;
    let status = status.parse::<CorrespondenceStatus>()?;
    Ok(Json(
        state
            .correspondence_service
            .by_kind_and_status(kind, status)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/rango-fechas",
    tag = "Correspondence",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Items received in the range", body = Vec<Correspondence>),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn received_between(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(
        state
            .correspondence_service
            .received_between(range.inicio, range.fin)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/retirado-por/{user_id}",
    tag = "Correspondence",
    params(("user_id" = i64, Path, description = "User ID")),
    responses((status = 200, description = "Items picked up by the user", body = Vec<Correspondence>))
)]
pub async fn picked_up_by(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(state.correspondence_service.picked_up_by(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/registrado-por/{user_id}",
    tag = "Correspondence",
    params(("user_id" = i64, Path, description = "Staff user ID")),
    responses((status = 200, description = "Items logged by the user", body = Vec<Correspondence>))
)]
pub async fn recorded_by(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(state.correspondence_service.recorded_by(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/pendientes",
    tag = "Correspondence",
    responses((status = 200, description = "Pending items, oldest first", body = Vec<Correspondence>))
)]
pub async fn pending(State(state): State<AppState>) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(state.correspondence_service.pending().await?))
}

#[utoipa::path(
    get,
    path = "/api/correspondencias/antiguas",
    tag = "Correspondence",
    params(CutoffQuery),
    responses((status = 200, description = "Pending items received before the cutoff", body = Vec<Correspondence>))
)]
pub async fn stale_pending(
    State(state): State<AppState>,
    Query(query): Query<CutoffQuery>,
) -> AppResult<Json<Vec<Correspondence>>> {
    Ok(Json(
        state
            .correspondence_service
            .stale_pending(query.antes_de)
            .await?,
    ))
}

/// Record the pickup of an item
#[utoipa::path(
    put,
    path = "/api/correspondencias/{id}/entregar",
    tag = "Correspondence",
    params(("id" = i64, Path, description = "Correspondence ID")),
    request_body = DeliverCorrespondence,
    responses(
        (status = 200, description = "Item delivered", body = Correspondence),
        (status = 404, description = "Item or user not found")
    )
)]
pub async fn mark_delivered(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<DeliverCorrespondence>,
) -> AppResult<Json<Correspondence>> {
    Ok(Json(
        state
            .correspondence_service
            .mark_delivered(id, payload.picked_up_by_id)
            .await?,
    ))
}
