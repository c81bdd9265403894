//! Mail and packages received at the front desk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

string_enum! {
    CorrespondenceKind, "correspondence type", default = Other {
        Package => "PAQUETE",
        Document => "DOCUMENTO",
        Other => "OTRO",
    }
}

string_enum! {
    CorrespondenceStatus, "correspondence status", default = Pending {
        Pending => "PENDIENTE",
        Delivered => "ENTREGADA",
    }
}

/// Correspondence domain entity with the names of the people involved
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Correspondence {
    #[schema(example = 1)]
    pub id: i64,
    /// Staff member who logged the item
    pub recorded_by_id: i64,
    pub recipient_id: i64,
    /// Person who picked the item up
    pub picked_up_by_id: Option<i64>,
    pub apartment_id: Option<i64>,
    pub kind: CorrespondenceKind,
    pub received_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: CorrespondenceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub recorded_by_name: Option<String>,
    pub recipient_name: Option<String>,
    pub picked_up_by_name: Option<String>,
}

/// Correspondence create/update request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CorrespondenceInput {
    pub recorded_by_id: i64,
    pub recipient_id: i64,
    pub picked_up_by_id: Option<i64>,
    pub apartment_id: Option<i64>,
    pub kind: CorrespondenceKind,
    /// Defaults to the time of registration
    pub received_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CorrespondenceStatus,
    #[validate(length(max = 500, message = "Notes must have at most 500 characters"))]
    pub notes: Option<String>,
}

/// Pickup confirmation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeliverCorrespondence {
    pub picked_up_by_id: i64,
}

/// Listing criteria. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrespondenceFilter {
    pub recipient_id: Option<i64>,
    pub recorded_by_id: Option<i64>,
    pub picked_up_by_id: Option<i64>,
    pub status: Option<CorrespondenceStatus>,
    pub kind: Option<CorrespondenceKind>,
    /// Inclusive lower bound on `received_at`
    pub received_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `received_at`
    pub received_to: Option<DateTime<Utc>>,
    /// Strict upper bound on `received_at`
    pub received_before: Option<DateTime<Utc>>,
    /// Order by `received_at` ascending instead of by id
    pub oldest_first: bool,
}

impl CorrespondenceFilter {
    pub fn pending() -> Self {
        Self {
            status: Some(CorrespondenceStatus::Pending),
            oldest_first: true,
            ..Default::default()
        }
    }
}
