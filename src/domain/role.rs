//! Roles and their permission lists.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::is_valid_permission;
use crate::errors::{AppError, AppResult};

/// Role names are letters and underscores; they are uppercased before storage
static ROLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]+$").expect("role name pattern is valid"));

/// Canonical form of a role name
pub fn normalize_role_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Role domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Role {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "PROPIETARIO")]
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    #[schema(example = json!(["READ_PROFILE", "UPDATE_PROFILE"]))]
    pub permissions: Vec<String>,
    /// Users holding this role through an active assignment
    pub number_of_users: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Exact membership test on the parsed permission list
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Permission list as persisted in the `permisos` text column (a JSON array).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(Vec<String>);

impl Permissions {
    pub fn new(permissions: Vec<String>) -> Self {
        Self(permissions)
    }

    /// Parse the stored column. Empty or unreadable text yields an empty list.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::default(),
            Some(text) => match serde_json::from_str::<Vec<String>>(text) {
                Ok(list) => Self(list),
                Err(e) => {
                    tracing::warn!("Unreadable permission list {:?}: {}", text, e);
                    Self::default()
                }
            },
        }
    }

    /// JSON text for storage; an empty list is stored as `[]`
    pub fn to_stored(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// Every entry must belong to the permission catalog
    pub fn validate(&self) -> AppResult<()> {
        match self.0.iter().find(|p| !is_valid_permission(p)) {
            Some(unknown) => Err(AppError::bad_request(format!(
                "unknown permission '{}'",
                unknown
            ))),
            None => Ok(()),
        }
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.iter().any(|p| p == permission)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Data required to insert a role row
#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Permissions,
}

/// Field changes applied to an existing role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub permissions: Option<Permissions>,
    pub active: Option<bool>,
}

/// Role creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRole {
    #[validate(
        length(min = 3, max = 50, message = "Role name must have 3 to 50 characters"),
        regex(path = *ROLE_NAME_PATTERN, message = "Role name may only contain letters and underscores")
    )]
    #[schema(example = "CONSERJE")]
    pub name: String,
    #[validate(length(max = 255, message = "Description must have at most 255 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Full role replacement request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRole {
    #[validate(
        length(min = 3, max = 50, message = "Role name must have 3 to 50 characters"),
        regex(path = *ROLE_NAME_PATTERN, message = "Role name may only contain letters and underscores")
    )]
    pub name: String,
    #[validate(length(max = 255, message = "Description must have at most 255 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub active: Option<bool>,
}

impl From<UpdateRole> for RoleChanges {
    fn from(update: UpdateRole) -> Self {
        Self {
            name: Some(update.name),
            description: Some(update.description),
            permissions: Some(Permissions::new(update.permissions)),
            active: update.active,
        }
    }
}

/// Partial role update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PatchRole {
    #[validate(
        length(min = 3, max = 50, message = "Role name must have 3 to 50 characters"),
        regex(path = *ROLE_NAME_PATTERN, message = "Role name may only contain letters and underscores")
    )]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Description must have at most 255 characters"))]
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl From<PatchRole> for RoleChanges {
    fn from(patch: PatchRole) -> Self {
        Self {
            name: patch.name,
            description: patch.description.map(Some),
            permissions: patch.permissions.map(Permissions::new),
            active: patch.active,
        }
    }
}

/// Aggregate role counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RoleStatistics {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    /// Active users per role name
    pub users_by_role: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_stored_as_json_array() {
        let permissions = Permissions::new(vec!["READ_PROFILE".into(), "MANAGE_ACCESS".into()]);
        assert_eq!(permissions.to_stored(), r#"["READ_PROFILE","MANAGE_ACCESS"]"#);
        assert_eq!(Permissions::default().to_stored(), "[]");
    }

    #[test]
    fn test_permissions_parse_tolerates_bad_text() {
        assert_eq!(Permissions::from_stored(None), Permissions::default());
        assert_eq!(Permissions::from_stored(Some("  ")), Permissions::default());
        assert_eq!(Permissions::from_stored(Some("READ_USERS")), Permissions::default());

        let parsed = Permissions::from_stored(Some(r#"["READ_USERS"]"#));
        assert!(parsed.contains("READ_USERS"));
    }

    #[test]
    fn test_membership_is_exact() {
        let parsed = Permissions::from_stored(Some(r#"["READ_USERS"]"#));
        assert!(!parsed.contains("READ_USER"));
    }

    #[test]
    fn test_validate_against_catalog() {
        assert!(Permissions::new(vec!["ALL_PERMISSIONS".into()]).validate().is_ok());
        assert!(Permissions::new(vec!["FLY".into()]).validate().is_err());
    }

    #[test]
    fn test_normalize_role_name() {
        assert_eq!(normalize_role_name(" conserje "), "CONSERJE");
    }

    #[test]
    fn test_create_role_name_rules() {
        let request = CreateRole {
            name: "jefe de torre".to_string(),
            description: None,
            permissions: vec![],
        };
        assert!(request.validate().is_err());
    }
}
