//! API layer - HTTP surface of the service
//!
//! One handler module per resource under `/api`, the bearer-token
//! middleware for the session routes, the validating JSON extractor and
//! the generated OpenAPI document.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
