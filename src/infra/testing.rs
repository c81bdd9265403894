//! In-memory unit of work over repository mocks, for service tests.

use std::sync::Arc;

use async_trait::async_trait;

use super::repositories::*;
use super::unit_of_work::{TransactionContext, TxFuture, UnitOfWork};
use crate::errors::{AppError, AppResult};

/// Hands out the configured mocks; unset repositories are mocks without
/// expectations, so any call to them fails the test.
pub(crate) struct TestUnitOfWork {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    apartments: Arc<dyn ApartmentRepository>,
    parking_spots: Arc<dyn ParkingRepository>,
    common_areas: Arc<dyn CommonAreaRepository>,
    correspondence: Arc<dyn CorrespondenceRepository>,
    requests: Arc<dyn RequestRepository>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            roles: Arc::new(MockRoleRepository::new()),
            assignments: Arc::new(MockAssignmentRepository::new()),
            apartments: Arc::new(MockApartmentRepository::new()),
            parking_spots: Arc::new(MockParkingRepository::new()),
            common_areas: Arc::new(MockCommonAreaRepository::new()),
            correspondence: Arc::new(MockCorrespondenceRepository::new()),
            requests: Arc::new(MockRequestRepository::new()),
        }
    }

    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_roles(mut self, repo: MockRoleRepository) -> Self {
        self.roles = Arc::new(repo);
        self
    }

    pub fn with_assignments(mut self, repo: MockAssignmentRepository) -> Self {
        self.assignments = Arc::new(repo);
        self
    }

    pub fn with_apartments(mut self, repo: MockApartmentRepository) -> Self {
        self.apartments = Arc::new(repo);
        self
    }

    pub fn with_parking_spots(mut self, repo: MockParkingRepository) -> Self {
        self.parking_spots = Arc::new(repo);
        self
    }

    pub fn with_common_areas(mut self, repo: MockCommonAreaRepository) -> Self {
        self.common_areas = Arc::new(repo);
        self
    }

    pub fn with_correspondence(mut self, repo: MockCorrespondenceRepository) -> Self {
        self.correspondence = Arc::new(repo);
        self
    }

    pub fn with_requests(mut self, repo: MockRequestRepository) -> Self {
        self.requests = Arc::new(repo);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignments.clone()
    }

    fn apartments(&self) -> Arc<dyn ApartmentRepository> {
        self.apartments.clone()
    }

    fn parking_spots(&self) -> Arc<dyn ParkingRepository> {
        self.parking_spots.clone()
    }

    fn common_areas(&self) -> Arc<dyn CommonAreaRepository> {
        self.common_areas.clone()
    }

    fn correspondence(&self) -> Arc<dyn CorrespondenceRepository> {
        self.correspondence.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.requests.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("no database transaction in unit tests"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("no database transaction in unit tests"))
    }
}
