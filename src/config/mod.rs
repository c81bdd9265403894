//! Application configuration
//!
//! Environment-driven settings plus the business constants shared by the
//! services (document types, default roles, permission catalog).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
