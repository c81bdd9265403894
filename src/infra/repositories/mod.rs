//! Repository layer - Data access abstraction
//!
//! One trait per table with a SeaORM-backed store. Services depend on the
//! traits so they can be exercised against `mockall` mocks.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};

mod apartment_repository;
mod assignment_repository;
mod common_area_repository;
mod correspondence_repository;
pub(crate) mod entities;
mod parking_repository;
mod request_repository;
mod role_repository;
mod user_repository;

pub use apartment_repository::{ApartmentRepository, ApartmentStore};
pub use assignment_repository::{AssignmentRepository, AssignmentStore};
pub use common_area_repository::{CommonAreaRepository, CommonAreaStore};
pub use correspondence_repository::{CorrespondenceRepository, CorrespondenceStore};
pub use parking_repository::{ParkingRepository, ParkingStore};
pub use request_repository::{RequestRepository, RequestStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use assignment_repository::assignment_queries;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use apartment_repository::MockApartmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use common_area_repository::MockCommonAreaRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use correspondence_repository::MockCorrespondenceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use parking_repository::MockParkingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use request_repository::MockRequestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Case-insensitive `LIKE '%text%'` over one column.
pub(crate) fn contains_ignore_case<C: IntoColumnRef>(column: C, text: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", text.trim().to_lowercase()))
}
