//! Resident requests: maintenance, complaints, bookings and inquiries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

string_enum! {
    RequestKind, "request type", default = Inquiry {
        Maintenance => "mantenimiento",
        Complaint => "queja",
        Booking => "reserva",
        Inquiry => "consulta",
    }
}

string_enum! {
    RequestStatus, "request status", default = Pending {
        Pending => "pendiente",
        InProgress => "en_proceso",
        Resolved => "resuelta",
        Rejected => "rechazada",
    }
}

impl RequestStatus {
    /// Resolved and rejected requests are closed
    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Resolved | RequestStatus::Rejected)
    }
}

/// Service request domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ServiceRequest {
    #[schema(example = 1)]
    pub id: i64,
    pub user_id: i64,
    pub kind: RequestKind,
    pub description: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the request is closed
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Request creation
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    pub user_id: i64,
    pub kind: RequestKind,
    #[validate(length(min = 10, max = 500, message = "Description must have 10 to 500 characters"))]
    #[schema(example = "La luz del pasillo del piso 5 no enciende")]
    pub description: String,
}

/// Request edition: status and description only
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    pub status: RequestStatus,
    #[validate(length(min = 10, max = 500, message = "Description must have 10 to 500 characters"))]
    pub description: String,
}

/// Listing criteria. Empty lists and unset bounds do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilter {
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub resolved_from: Option<DateTime<Utc>>,
    pub resolved_to: Option<DateTime<Utc>>,
    pub statuses: Vec<RequestStatus>,
    pub kinds: Vec<RequestKind>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    /// Sort by resolution date instead of creation date
    pub order_by_resolution: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_statuses() {
        assert!(RequestStatus::Resolved.is_closed());
        assert!(RequestStatus::Rejected.is_closed());
        assert!(!RequestStatus::InProgress.is_closed());
    }

    #[test]
    fn test_wire_values_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::InProgress).unwrap(),
            "\"en_proceso\""
        );
        assert_eq!("queja".parse::<RequestKind>().unwrap(), RequestKind::Complaint);
    }
}
