//! Domain layer - Core business entities and logic
//!
//! Residents, staff and their roles, plus the property records the
//! administration keeps (apartments, parking, common areas, mail, requests).
//! Nothing here talks to the database or HTTP.

/// Declares a closed set of values stored and transported as fixed strings.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal, default = $default:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                #[doc = $value]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire and storage representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Lenient conversion for values read back from storage
            pub fn from_stored(value: &str) -> Self {
                value.parse().unwrap_or_default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(crate::errors::AppError::bad_request(format!(
                        "invalid {} '{}'",
                        $label, other
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

pub mod apartment;
pub mod assignment;
pub mod common_area;
pub mod correspondence;
pub mod parking;
pub mod password;
pub mod request;
pub mod role;
pub mod user;

pub use apartment::{Apartment, ApartmentInput, OccupancyStatus};
pub use assignment::{
    AssignmentPolicy, AssignmentStats, CreateAssignment, ExclusiveRoles, RoleAssignment, RoleIds,
    UpdateAssignment, UserIds,
};
pub use common_area::{AreaStatus, CommonArea, CommonAreaFilter, CreateCommonArea, UpdateCommonArea};
pub use correspondence::{
    Correspondence, CorrespondenceFilter, CorrespondenceInput, CorrespondenceKind,
    CorrespondenceStatus, DeliverCorrespondence,
};
pub use parking::{ParkingInput, ParkingSpot, SpotType};
pub use password::Password;
pub use request::{
    CreateServiceRequest, RequestFilter, RequestKind, RequestStatus, ServiceRequest,
    UpdateServiceRequest,
};
pub use role::{
    normalize_role_name, CreateRole, NewRole, PatchRole, Permissions, Role, RoleChanges,
    RoleStatistics, UpdateRole,
};
pub use user::{
    ChangePassword, CreateUser, DocumentType, NewUser, PatchUser, ResetPassword, UpdateUser, User,
    UserChanges, UserResponse, UserStatistics,
};
