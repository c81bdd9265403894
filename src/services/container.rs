//! Service Container - Centralized service access.
//!
//! Builds every service over one shared unit of work and hands them out
//! as trait objects, so the HTTP layer never sees concrete managers.

use std::sync::Arc;

use super::{
    ApartmentManager, ApartmentService, AssignmentManager, AssignmentService, AuthService,
    Authenticator, CommonAreaManager, CommonAreaService, CorrespondenceManager,
    CorrespondenceService, ParkingManager, ParkingService, RequestManager, RequestService,
    RoleManager, RoleService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn roles(&self) -> Arc<dyn RoleService>;

    fn assignments(&self) -> Arc<dyn AssignmentService>;

    fn apartments(&self) -> Arc<dyn ApartmentService>;

    fn parking_spots(&self) -> Arc<dyn ParkingService>;

    fn common_areas(&self) -> Arc<dyn CommonAreaService>;

    fn correspondence(&self) -> Arc<dyn CorrespondenceService>;

    fn requests(&self) -> Arc<dyn RequestService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    roles: Arc<dyn RoleService>,
    assignments: Arc<dyn AssignmentService>,
    apartments: Arc<dyn ApartmentService>,
    parking_spots: Arc<dyn ParkingService>,
    common_areas: Arc<dyn CommonAreaService>,
    correspondence: Arc<dyn CorrespondenceService>,
    requests: Arc<dyn RequestService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            users: Arc::new(UserManager::new(uow.clone())),
            roles: Arc::new(RoleManager::new(uow.clone())),
            assignments: Arc::new(AssignmentManager::new(uow.clone())),
            apartments: Arc::new(ApartmentManager::new(uow.clone())),
            parking_spots: Arc::new(ParkingManager::new(uow.clone())),
            common_areas: Arc::new(CommonAreaManager::new(uow.clone())),
            correspondence: Arc::new(CorrespondenceManager::new(uow.clone())),
            requests: Arc::new(RequestManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.roles.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentService> {
        self.assignments.clone()
    }

    fn apartments(&self) -> Arc<dyn ApartmentService> {
        self.apartments.clone()
    }

    fn parking_spots(&self) -> Arc<dyn ParkingService> {
        self.parking_spots.clone()
    }

    fn common_areas(&self) -> Arc<dyn CommonAreaService> {
        self.common_areas.clone()
    }

    fn correspondence(&self) -> Arc<dyn CorrespondenceService> {
        self.correspondence.clone()
    }

    fn requests(&self) -> Arc<dyn RequestService> {
        self.requests.clone()
    }
}
