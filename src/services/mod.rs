//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod apartment_service;
mod assignment_service;
mod auth_service;
mod common_area_service;
pub mod container;
mod correspondence_service;
mod parking_service;
mod request_service;
mod role_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use apartment_service::{ApartmentManager, ApartmentService};
pub use assignment_service::{AssignmentManager, AssignmentService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use common_area_service::{CommonAreaManager, CommonAreaService};
pub use correspondence_service::{CorrespondenceManager, CorrespondenceService};
pub use parking_service::{ParkingManager, ParkingService};
pub use request_service::{RequestManager, RequestService};
pub use role_service::{RoleManager, RoleService};
pub use user_service::{UserManager, UserService};
