//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories over the SeaORM entities
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
#[cfg(test)]
pub(crate) mod testing;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    ApartmentRepository, ApartmentStore, AssignmentRepository, AssignmentStore,
    CommonAreaRepository, CommonAreaStore, CorrespondenceRepository, CorrespondenceStore,
    ParkingRepository, ParkingStore, RequestRepository, RequestStore, RoleRepository, RoleStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxAssignmentRepository, TxFuture, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockApartmentRepository, MockAssignmentRepository, MockCommonAreaRepository,
    MockCorrespondenceRepository, MockParkingRepository, MockRequestRepository,
    MockRoleRepository, MockUserRepository,
};
