//! Apartment handlers (`/api/apartamentos`).

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Apartment, ApartmentInput};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Create apartment routes
pub fn apartment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_apartments).post(create_apartment))
        .route(
            "/:id",
            get(get_apartment)
                .put(update_apartment)
                .delete(delete_apartment),
        )
}

#[utoipa::path(
    get,
    path = "/api/apartamentos",
    tag = "Apartments",
    responses((status = 200, description = "All apartments", body = Vec<Apartment>))
)]
pub async fn list_apartments(State(state): State<AppState>) -> AppResult<Json<Vec<Apartment>>> {
    Ok(Json(state.apartment_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/apartamentos/{id}",
    tag = "Apartments",
    params(("id" = i64, Path, description = "Apartment ID")),
    responses(
        (status = 200, description = "Apartment found", body = Apartment),
        (status = 404, description = "Apartment not found")
    )
)]
pub async fn get_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Apartment>> {
    Ok(Json(state.apartment_service.get(id).await?))
}

/// Register an apartment for an existing owner
#[utoipa::path(
    post,
    path = "/api/apartamentos",
    tag = "Apartments",
    request_body = ApartmentInput,
    responses(
        (status = 201, description = "Apartment created", body = Apartment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_apartment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ApartmentInput>,
) -> AppResult<Created<Apartment>> {
    Ok(Created(state.apartment_service.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/apartamentos/{id}",
    tag = "Apartments",
    params(("id" = i64, Path, description = "Apartment ID")),
    request_body = ApartmentInput,
    responses(
        (status = 200, description = "Apartment updated", body = Apartment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Apartment or owner not found")
    )
)]
pub async fn update_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ApartmentInput>,
) -> AppResult<Json<Apartment>> {
    Ok(Json(state.apartment_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/apartamentos/{id}",
    tag = "Apartments",
    params(("id" = i64, Path, description = "Apartment ID")),
    responses(
        (status = 204, description = "Apartment deleted"),
        (status = 404, description = "Apartment not found")
    )
)]
pub async fn delete_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.apartment_service.delete(id).await?;
    Ok(NoContent)
}
