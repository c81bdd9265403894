//! Parking spots.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::apartment::OccupancyStatus;

string_enum! {
    /// Who a parking spot is reserved for
    SpotType, "spot type", default = Resident {
        Resident => "RESIDENTE",
        Visitor => "VISITANTE",
    }
}

/// Parking spot domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ParkingSpot {
    #[schema(example = 1)]
    pub id: i64,
    #[serde(rename = "role_type")]
    pub spot_type: SpotType,
    #[schema(example = "S1-023")]
    pub number: String,
    /// Assigned user, if any
    pub user_id: Option<i64>,
    pub status: OccupancyStatus,
}

/// Parking spot create/update request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ParkingInput {
    #[serde(rename = "role_type", alias = "spot_type")]
    pub spot_type: SpotType,
    #[validate(length(min = 1, max = 15, message = "Number must have 1 to 15 characters"))]
    #[schema(example = "S1-023")]
    pub number: String,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub status: OccupancyStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_type_travels_as_role_type() {
        let input: ParkingInput =
            serde_json::from_str(r#"{"role_type":"VISITANTE","number":"V-01"}"#).unwrap();
        assert_eq!(input.spot_type, SpotType::Visitor);
        assert_eq!(input.status, OccupancyStatus::Free);

        let spot = ParkingSpot {
            id: 1,
            spot_type: input.spot_type,
            number: input.number,
            user_id: None,
            status: input.status,
        };
        let json = serde_json::to_value(&spot).unwrap();
        assert_eq!(json["role_type"], "VISITANTE");
    }
}
