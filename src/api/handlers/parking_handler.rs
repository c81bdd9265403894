//! Parking spot handlers (`/api/parqueaderos`).

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ParkingInput, ParkingSpot};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Create parking spot routes
pub fn parking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_spots).post(create_spot))
        .route("/:id", get(get_spot).put(update_spot).delete(delete_spot))
}

#[utoipa::path(
    get,
    path = "/api/parqueaderos",
    tag = "Parking",
    responses((status = 200, description = "All parking spots", body = Vec<ParkingSpot>))
)]
pub async fn list_spots(State(state): State<AppState>) -> AppResult<Json<Vec<ParkingSpot>>> {
    Ok(Json(state.parking_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/parqueaderos/{id}",
    tag = "Parking",
    params(("id" = i64, Path, description = "Parking spot ID")),
    responses(
        (status = 200, description = "Parking spot found", body = ParkingSpot),
        (status = 404, description = "Parking spot not found")
    )
)]
pub async fn get_spot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ParkingSpot>> {
    Ok(Json(state.parking_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/parqueaderos",
    tag = "Parking",
    request_body = ParkingInput,
    responses(
        (status = 201, description = "Parking spot created", body = ParkingSpot),
        (status = 404, description = "Assigned user not found"),
        (status = 409, description = "Spot number already registered")
    )
)]
pub async fn create_spot(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ParkingInput>,
) -> AppResult<Created<ParkingSpot>> {
    Ok(Created(state.parking_service.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/parqueaderos/{id}",
    tag = "Parking",
    params(("id" = i64, Path, description = "Parking spot ID")),
    request_body = ParkingInput,
    responses(
        (status = 200, description = "Parking spot updated", body = ParkingSpot),
        (status = 404, description = "Parking spot or user not found"),
        (status = 409, description = "Spot number already registered")
    )
)]
pub async fn update_spot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ParkingInput>,
) -> AppResult<Json<ParkingSpot>> {
    Ok(Json(state.parking_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/parqueaderos/{id}",
    tag = "Parking",
    params(("id" = i64, Path, description = "Parking spot ID")),
    responses(
        (status = 204, description = "Parking spot deleted"),
        (status = 404, description = "Parking spot not found")
    )
)]
pub async fn delete_spot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.parking_service.delete(id).await?;
    Ok(NoContent)
}
