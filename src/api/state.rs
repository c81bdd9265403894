//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    ApartmentService, AssignmentService, AuthService, CommonAreaService, CorrespondenceService,
    ParkingService, RequestService, RoleService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
///
/// Fields are public so tests can swap a single service for a stub.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub role_service: Arc<dyn RoleService>,
    pub assignment_service: Arc<dyn AssignmentService>,
    pub apartment_service: Arc<dyn ApartmentService>,
    pub parking_service: Arc<dyn ParkingService>,
    pub common_area_service: Arc<dyn CommonAreaService>,
    pub correspondence_service: Arc<dyn CorrespondenceService>,
    pub request_service: Arc<dyn RequestService>,
    /// Used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build every service over the given database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Take the services of an existing container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            role_service: container.roles(),
            assignment_service: container.assignments(),
            apartment_service: container.apartments(),
            parking_service: container.parking_spots(),
            common_area_service: container.common_areas(),
            correspondence_service: container.correspondence(),
            request_service: container.requests(),
            database,
        }
    }
}
