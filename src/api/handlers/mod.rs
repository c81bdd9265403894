//! HTTP request handlers, one module per resource.

pub mod apartment_handler;
pub mod assignment_handler;
pub mod auth_handler;
pub mod common_area_handler;
pub mod correspondence_handler;
pub mod parking_handler;
pub mod request_handler;
pub mod role_handler;
pub mod user_handler;

pub use apartment_handler::apartment_routes;
pub use assignment_handler::assignment_routes;
pub use auth_handler::{auth_routes, session_routes};
pub use common_area_handler::common_area_routes;
pub use correspondence_handler::correspondence_routes;
pub use parking_handler::parking_routes;
pub use request_handler::request_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
