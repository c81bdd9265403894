//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod apartment;
pub mod assignment;
pub mod common_area;
pub mod correspondence;
pub mod parking_spot;
pub mod role;
pub mod service_request;
pub mod user;
