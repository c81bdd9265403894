//! Role assignments (the `usuario_rol` association).
//!
//! An assignment links one user to one role and carries its own `active`
//! flag; at most one active assignment exists per (user, role) pair.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Role assignment with denormalized user and role labels
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RoleAssignment {
    #[schema(example = 1)]
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = "1032456789")]
    pub user_document_number: Option<String>,
    #[schema(example = "María Fernanda Rojas Pérez")]
    pub user_full_name: Option<String>,
    #[schema(example = "PROPIETARIO")]
    pub role_name: Option<String>,
}

/// Assignment creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignment {
    #[validate(range(min = 1, message = "User id must be positive"))]
    pub user_id: i64,
    #[validate(range(min = 1, message = "Role id must be positive"))]
    pub role_id: i64,
}

/// Assignment update request; only the active flag can change
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignment {
    pub active: bool,
}

/// Several roles for one user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RoleIds {
    #[validate(length(min = 1, message = "At least one role is required"))]
    pub role_ids: Vec<i64>,
}

/// Several users for one role
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserIds {
    #[validate(length(min = 1, message = "At least one user is required"))]
    pub user_ids: Vec<i64>,
}

/// Aggregate assignment counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AssignmentStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    /// Active assignments per role name
    pub by_role: BTreeMap<String, u64>,
    /// Active assignments per user id
    pub by_user: BTreeMap<String, u64>,
}

/// Reference policy data published with the assignment API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignmentPolicy {
    pub max_roles_per_user: u32,
    pub role_user_limits: BTreeMap<String, u32>,
    pub exclusive_roles: Vec<ExclusiveRoles>,
    pub expiration_days: BTreeMap<String, u32>,
}

/// Two roles that should not be held together
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExclusiveRoles {
    pub role: String,
    pub excludes: String,
}

impl AssignmentPolicy {
    pub fn from_constants() -> Self {
        use crate::config::{
            EXCLUSIVE_ROLES, MAX_ROLES_PER_USER, ROLE_EXPIRATION_DAYS, ROLE_USER_LIMITS,
        };

        Self {
            max_roles_per_user: MAX_ROLES_PER_USER,
            role_user_limits: ROLE_USER_LIMITS
                .iter()
                .map(|(role, limit)| (role.to_string(), *limit))
                .collect(),
            exclusive_roles: EXCLUSIVE_ROLES
                .iter()
                .map(|(role, excludes)| ExclusiveRoles {
                    role: role.to_string(),
                    excludes: excludes.to_string(),
                })
                .collect(),
            expiration_days: ROLE_EXPIRATION_DAYS
                .iter()
                .map(|(role, days)| (role.to_string(), *days))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_request_requires_items() {
        assert!(RoleIds { role_ids: vec![] }.validate().is_err());
        assert!(UserIds { user_ids: vec![4, 5] }.validate().is_ok());
    }

    #[test]
    fn test_policy_lists_admin_limit() {
        let policy = AssignmentPolicy::from_constants();
        assert_eq!(policy.role_user_limits.get("ADMINISTRADOR"), Some(&3));
        assert!(!policy.exclusive_roles.is_empty());
    }
}
