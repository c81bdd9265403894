//! Apartments and their occupancy.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

string_enum! {
    /// Occupancy state shared by apartments and parking spots
    OccupancyStatus, "status", default = Free {
        Free => "LIBRE",
        Occupied => "OCUPADO",
        Inactive => "INACTIVO",
    }
}

/// Apartment domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Apartment {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "502")]
    pub number: String,
    #[schema(example = "B")]
    pub tower: String,
    pub owner_id: i64,
    pub status: OccupancyStatus,
}

/// Apartment create/update request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ApartmentInput {
    #[validate(length(min = 1, max = 10, message = "Number must have 1 to 10 characters"))]
    #[schema(example = "502")]
    pub number: String,
    #[validate(length(min = 1, max = 20, message = "Tower must have 1 to 20 characters"))]
    #[schema(example = "B")]
    pub tower: String,
    pub owner_id: i64,
    #[serde(default)]
    pub status: OccupancyStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_free() {
        let input: ApartmentInput =
            serde_json::from_str(r#"{"number":"101","tower":"A","owner_id":3}"#).unwrap();
        assert_eq!(input.status, OccupancyStatus::Free);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<ApartmentInput>(
            r#"{"number":"101","tower":"A","owner_id":3,"status":"VENDIDO"}"#,
        );
        assert!(parsed.is_err());
        assert!("VENDIDO".parse::<OccupancyStatus>().is_err());
    }
}
