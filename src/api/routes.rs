//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    apartment_routes, assignment_routes, auth_routes, common_area_routes, correspondence_routes,
    parking_routes, request_routes, role_routes, session_routes, user_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth = auth_routes().merge(session_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    ));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/usuarios", user_routes())
        .nest("/roles", role_routes())
        .nest("/usuario-roles", assignment_routes())
        .nest("/apartamentos", apartment_routes())
        .nest("/parqueaderos", parking_routes())
        .nest("/areas-comunes", common_area_routes())
        .nest("/correspondencias", correspondence_routes())
        .nest("/solicitudes", request_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Arkania residential management API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Dependency status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, database) = match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            "healthy",
            ServiceStatus {
                status: "healthy",
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                ServiceStatus {
                    status: "unhealthy",
                    error: Some(e.to_string()),
                },
            )
        }
    };

    (code, Json(HealthResponse { status, database }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use chrono::Utc;
    use mockall::predicate::eq;
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::domain::{DocumentType, Role, RoleAssignment, User};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{
        Database, MockAssignmentRepository, MockRequestRepository, MockRoleRepository,
        MockUserRepository,
    };
    use crate::services::{AssignmentManager, RequestManager, RoleManager, UserManager};

    fn state() -> AppState {
        let database = Arc::new(Database::new(DatabaseConnection::Disconnected));
        AppState::from_config(database, Config::with_secret("router-test-secret-32-characters!"))
    }

    async fn send(state: AppState, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn user(id: i64, active: bool) -> User {
        User {
            id,
            document_type: DocumentType::Cc,
            document_number: "1032456789".to_string(),
            first_names: "Andrés".to_string(),
            last_names: "Salazar".to_string(),
            email: "andres.salazar@example.com".to_string(),
            phone: None,
            password_hash: "hash".to_string(),
            active,
            roles: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn role(id: i64, name: &str) -> Role {
        Role {
            id,
            name: name.to_string(),
            description: None,
            active: true,
            permissions: vec![],
            number_of_users: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assignment(user_id: i64, role_id: i64) -> RoleAssignment {
        RoleAssignment {
            id: 12,
            user_id,
            role_id,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_document_number: None,
            user_full_name: None,
            role_name: Some("VIGILANTE".to_string()),
        }
    }

    #[tokio::test]
    async fn test_delete_role_with_assignments_is_conflict() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .with(eq(6))
            .returning(|id| Ok(Some(role(id, "VIGILANTE"))));
        roles.expect_update().never();
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_count_by_role()
            .with(eq(6), eq(None::<bool>))
            .returning(|_, _| Ok(2));

        let uow = TestUnitOfWork::new()
            .with_roles(roles)
            .with_assignments(assignments)
            .into_arc();
        let mut state = state();
        state.role_service = Arc::new(RoleManager::new(uow));

        let (status, body) = send(state, Method::DELETE, "/api/roles/6").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_OPERATION");
    }

    #[tokio::test]
    async fn test_delete_user_deactivates_and_returns_no_content() {
        let mut users = MockUserRepository::new();
        users.expect_update()
            .withf(|id, changes| *id == 8 && changes.active == Some(false))
            .times(1)
            .returning(|id, _| Ok(user(id, false)));

        let uow = TestUnitOfWork::new().with_users(users).into_arc();
        let mut state = state();
        state.user_service = Arc::new(UserManager::new(uow));

        let (status, _) = send(state, Method::DELETE, "/api/usuarios/8").await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_assigning_an_active_pair_is_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(user(id, true))));
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(role(id, "VIGILANTE"))));
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_find_active_by_pair()
            .with(eq(8), eq(3))
            .returning(|u, r| Ok(Some(assignment(u, r))));
        assignments.expect_assign().never();

        let uow = TestUnitOfWork::new()
            .with_users(users)
            .with_roles(roles)
            .with_assignments(assignments)
            .into_arc();
        let mut state = state();
        state.assignment_service = Arc::new(AssignmentManager::new(uow));

        let (status, body) = send(state, Method::POST, "/api/usuario-roles/asignar/8/3").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_request_filters_without_values_are_bad_request() {
        let mut requests = MockRequestRepository::new();
        requests.expect_search().never();

        let uow = TestUnitOfWork::new().with_requests(requests).into_arc();
        let mut state = state();
        state.request_service = Arc::new(RequestManager::new(uow));

        for uri in [
            "/api/solicitudes/por-estados",
            "/api/solicitudes/por-tipos",
            "/api/solicitudes/filtrar-estado-y-tipo?estados=pendiente",
        ] {
            let (status, body) = send(state.clone(), Method::GET, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"]["code"], "BAD_REQUEST");
        }
    }
}
