//! Integration tests for API endpoints.
//!
//! The router runs over a disconnected database; services that a test
//! exercises are replaced with stubs so no server is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use arkania_api::api::{create_router, AppState};
use arkania_api::config::Config;
use arkania_api::domain::{
    Apartment, ApartmentInput, AreaStatus, CommonArea, CreateCommonArea, DocumentType,
    OccupancyStatus, UpdateCommonArea, User,
};
use arkania_api::errors::{AppError, AppResult};
use arkania_api::infra::Database;
use arkania_api::services::{
    ApartmentService, AuthService, Claims, CommonAreaService, TokenResponse,
};

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// Stub services
// =============================================================================

struct StubAuthService;

fn resident(id: i64) -> User {
    User {
        id,
        document_type: DocumentType::Cc,
        document_number: "1032456789".to_string(),
        first_names: "María Fernanda".to_string(),
        last_names: "Rojas Pérez".to_string(),
        email: "maria.rojas@example.com".to_string(),
        phone: None,
        password_hash: "hashed".to_string(),
        active: true,
        roles: vec!["PROPIETARIO".to_string()],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl AuthService for StubAuthService {
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse> {
        if identifier == "maria.rojas@example.com" && password == "SecurePass123!" {
            Ok(TokenResponse {
                access_token: "valid-test-token".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 86400,
            })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    async fn validate_credentials(&self, _identifier: &str, _password: &str) -> AppResult<User> {
        Ok(resident(7))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        if token == "valid-test-token" {
            Ok(Claims {
                sub: 7,
                email: "maria.rojas@example.com".to_string(),
                roles: vec!["PROPIETARIO".to_string()],
                exp: Utc::now().timestamp() + 3600,
                iat: Utc::now().timestamp(),
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }

    async fn current_user(&self, user_id: i64) -> AppResult<User> {
        Ok(resident(user_id))
    }
}

/// Apartment 1 exists; owners above 100 do not.
struct StubApartmentService;

fn apartment(id: i64, input: ApartmentInput) -> Apartment {
    Apartment {
        id,
        number: input.number,
        tower: input.tower,
        owner_id: input.owner_id,
        status: input.status,
    }
}

#[async_trait]
impl ApartmentService for StubApartmentService {
    async fn list(&self) -> AppResult<Vec<Apartment>> {
        Ok(vec![])
    }

    async fn get(&self, id: i64) -> AppResult<Apartment> {
        if id == 1 {
            Ok(Apartment {
                id,
                number: "502".to_string(),
                tower: "B".to_string(),
                owner_id: 7,
                status: OccupancyStatus::Occupied,
            })
        } else {
            Err(AppError::not_found("Apartment"))
        }
    }

    async fn create(&self, input: ApartmentInput) -> AppResult<Apartment> {
        if input.owner_id > 100 {
            return Err(AppError::not_found("Owner"));
        }
        Ok(apartment(10, input))
    }

    async fn update(&self, id: i64, input: ApartmentInput) -> AppResult<Apartment> {
        self.get(id).await?;
        Ok(apartment(id, input))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await.map(|_| ())
    }
}

struct StubCommonAreaService;

fn pool() -> CommonArea {
    CommonArea {
        id: 3,
        name: "Piscina".to_string(),
        description: "Piscina climatizada para residentes".to_string(),
        location: "Torre A, terraza".to_string(),
        max_capacity: 25,
        opening_hours: "Martes a domingo 9:00 - 20:00".to_string(),
        status: AreaStatus::Active,
    }
}

#[async_trait]
impl CommonAreaService for StubCommonAreaService {
    async fn list(&self) -> AppResult<Vec<CommonArea>> {
        Ok(vec![pool()])
    }

    async fn get(&self, _id: i64) -> AppResult<CommonArea> {
        Ok(pool())
    }

    async fn create(&self, _input: CreateCommonArea) -> AppResult<CommonArea> {
        Ok(pool())
    }

    async fn update(&self, _id: i64, _input: UpdateCommonArea) -> AppResult<CommonArea> {
        Ok(pool())
    }

    async fn delete(&self, _id: i64) -> AppResult<()> {
        Ok(())
    }

    async fn active_with_capacity_above(&self, capacity: i32) -> AppResult<Vec<CommonArea>> {
        Ok(vec![pool()]
            .into_iter()
            .filter(|a| a.max_capacity > capacity)
            .collect())
    }

    async fn by_status_with_capacity_above(
        &self,
        status: AreaStatus,
        capacity: i32,
    ) -> AppResult<Vec<CommonArea>> {
        Ok(vec![pool()]
            .into_iter()
            .filter(|a| a.status == status && a.max_capacity > capacity)
            .collect())
    }

    async fn search(&self, text: &str) -> AppResult<Vec<CommonArea>> {
        if text.trim().is_empty() {
            return Err(AppError::bad_request("Search text is required"));
        }
        Ok(vec![pool()])
    }

    async fn count_by_status(&self, status: AreaStatus) -> AppResult<u64> {
        Ok(if status == AreaStatus::Active { 1 } else { 0 })
    }
}

// =============================================================================
// Test helpers
// =============================================================================

fn app() -> Router {
    let database = Arc::new(Database::new(DatabaseConnection::Disconnected));
    let mut state = AppState::from_config(database, Config::with_secret(SECRET));
    state.auth_service = Arc::new(StubAuthService);
    state.apartment_service = Arc::new(StubApartmentService);
    state.common_area_service = Arc::new(StubCommonAreaService);
    create_router(state)
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Root and health
// =============================================================================

#[tokio::test]
async fn test_root_returns_banner() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Arkania"));
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Arkania API");
    assert!(body["paths"]["/api/usuario-roles/politicas"].is_object());
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_login_returns_token() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/auth/login",
        json!({"identifier": "maria.rojas@example.com", "password": "SecurePass123!"}),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["access_token"], "valid-test-token");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/auth/login",
        json!({"identifier": "maria.rojas@example.com", "password": "nope"}),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_me_requires_token() {
    let (status, body) = send(get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_rejects_unknown_token() {
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer forged")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer valid-test-token")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);
    assert_eq!(body["full_name"], "María Fernanda Rojas Pérez");
    assert!(body.get("password_hash").is_none());
}

// =============================================================================
// Validation and status mapping
// =============================================================================

#[tokio::test]
async fn test_apartment_lookup_maps_not_found() {
    let (status, body) = send(get("/api/apartamentos/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Apartment not found");
}

#[tokio::test]
async fn test_apartment_create_returns_created() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/apartamentos",
        json!({"number": "101", "tower": "A", "owner_id": 7}),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "LIBRE");
}

#[tokio::test]
async fn test_apartment_create_with_missing_owner() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/apartamentos",
        json!({"number": "101", "tower": "A", "owner_id": 500}),
    ))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Owner not found");
}

#[tokio::test]
async fn test_apartment_with_unknown_status_is_bad_request() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/apartamentos",
        json!({"number": "101", "tower": "A", "owner_id": 7, "status": "VENDIDO"}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_apartment_delete_returns_no_content() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/apartamentos/1")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let (status, _) = send(get("/api/apartamentos/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_name_with_digits_is_rejected() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/roles",
        json!({"name": "admin2", "description": "Bad name"}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_common_area_capacity_out_of_range() {
    let (status, body) = send(json_request(
        Method::POST,
        "/api/areas-comunes",
        json!({
            "name": "Gimnasio",
            "description": "Gimnasio con máquinas de cardio",
            "location": "Torre C, sótano",
            "max_capacity": 0,
            "opening_hours": "Lunes a sábado 6:00 - 22:00"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Capacity must be between 1 and 1000"));
}

#[tokio::test]
async fn test_common_areas_above_capacity() {
    let (status, body) = send(get("/api/areas-comunes/activas?capacidad_minima=20")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(get("/api/areas-comunes/activas?capacidad_minima=25")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_common_area_unknown_status_in_path() {
    let (status, body) = send(get("/api/areas-comunes/estado/cerrada/conteo")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_common_area_count_by_status() {
    let (status, body) = send(get("/api/areas-comunes/estado/activa/conteo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_blank_search_is_bad_request() {
    let (status, _) = send(get("/api/areas-comunes/buscar?texto=%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/apartamentos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(get("/api/ascensores")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
