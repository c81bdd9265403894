//! Shared facilities (pool, gym, event hall...).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

string_enum! {
    /// Whether a common area can be booked
    AreaStatus, "area status", default = Active {
        Active => "activa",
        Inactive => "inactiva",
    }
}

/// Common area domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommonArea {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Salón comunal")]
    pub name: String,
    pub description: String,
    #[schema(example = "Torre A, primer piso")]
    pub location: String,
    #[schema(example = 60)]
    pub max_capacity: i32,
    #[schema(example = "Lunes a domingo 8:00 - 22:00")]
    pub opening_hours: String,
    pub status: AreaStatus,
}

/// Common area creation request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateCommonArea {
    #[validate(length(min = 3, max = 100, message = "Name must have 3 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 10, max = 1000, message = "Description must have 10 to 1000 characters"))]
    pub description: String,
    #[validate(length(min = 5, max = 200, message = "Location must have 5 to 200 characters"))]
    pub location: String,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000"))]
    pub max_capacity: i32,
    #[validate(length(min = 5, max = 200, message = "Opening hours must have 5 to 200 characters"))]
    pub opening_hours: String,
    #[serde(default)]
    pub status: AreaStatus,
}

/// Common area update request (name and location are fixed once created)
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateCommonArea {
    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000"))]
    pub max_capacity: i32,
    #[validate(length(min = 10, max = 1000, message = "Description must have 10 to 1000 characters"))]
    pub description: String,
    #[validate(length(min = 5, max = 200, message = "Opening hours must have 5 to 200 characters"))]
    pub opening_hours: String,
    pub status: AreaStatus,
}

/// Listing criteria; results are ordered by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonAreaFilter {
    pub status: Option<AreaStatus>,
    /// Strictly greater than
    pub capacity_above: Option<i32>,
    /// Case-insensitive match on name or description
    pub text: Option<String>,
}
