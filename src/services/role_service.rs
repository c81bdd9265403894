//! Role service - Role catalog and permission management.
//!
//! Names are stored uppercase. Permissions live as a JSON list on the role;
//! `roles_with_permission` searches that text by substring while
//! `has_permission` checks exact membership.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{role_description, DEFAULT_ROLES, PROTECTED_ROLES};
use crate::domain::{
    normalize_role_name, CreateRole, NewRole, PatchRole, Permissions, Role, RoleChanges,
    RoleStatistics, UpdateRole, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Role service trait for dependency injection.
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn create_role(&self, request: CreateRole) -> AppResult<Role>;

    async fn get_role(&self, id: i64) -> AppResult<Role>;

    /// Lookup by the uppercased name
    async fn get_by_name(&self, name: &str) -> AppResult<Role>;

    async fn get_by_name_ignore_case(&self, name: &str) -> AppResult<Role>;

    async fn update_role(&self, id: i64, request: UpdateRole) -> AppResult<Role>;

    async fn patch_role(&self, id: i64, request: PatchRole) -> AppResult<Role>;

    /// Soft delete; refused while assignments reference the role
    async fn delete_role(&self, id: i64) -> AppResult<()>;

    async fn reactivate_role(&self, id: i64) -> AppResult<Role>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    async fn list_active_roles(&self) -> AppResult<Vec<Role>>;

    async fn list_inactive_roles(&self) -> AppResult<Vec<Role>>;

    async fn search_by_description(&self, text: &str) -> AppResult<Vec<Role>>;

    /// Active roles whose stored permission text contains `permission`
    async fn roles_with_permission(&self, permission: &str) -> AppResult<Vec<Role>>;

    async fn roles_of_user(&self, user_id: i64) -> AppResult<Vec<Role>>;

    async fn roles_without_users(&self) -> AppResult<Vec<Role>>;

    async fn roles_with_min_users(&self, minimum: u64) -> AppResult<Vec<Role>>;

    async fn roles_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Role>>;

    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    async fn exists_active_by_name(&self, name: &str) -> AppResult<bool>;

    /// False for protected roles and roles with assignments
    async fn can_delete(&self, id: i64) -> AppResult<bool>;

    /// Exact membership in the parsed permission list
    async fn has_permission(&self, id: i64, permission: &str) -> AppResult<bool>;

    async fn get_permissions(&self, id: i64) -> AppResult<Vec<String>>;

    async fn set_permissions(&self, id: i64, permissions: Vec<String>) -> AppResult<Role>;

    async fn add_permission(&self, id: i64, permission: &str) -> AppResult<Role>;

    async fn remove_permission(&self, id: i64, permission: &str) -> AppResult<Role>;

    /// Active users holding the role
    async fn users_with_role(&self, id: i64) -> AppResult<Vec<User>>;

    async fn count_users_with_role(&self, id: i64) -> AppResult<u64>;

    async fn statistics(&self) -> AppResult<RoleStatistics>;

    /// Create the missing default roles; returns the ones created
    async fn initialize_default_roles(&self) -> AppResult<Vec<Role>>;
}

/// Concrete implementation of RoleService using Unit of Work.
pub struct RoleManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RoleManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_name_free(&self, name: &str, current: Option<&Role>) -> AppResult<()> {
        if current.is_some_and(|role| role.name == name) {
            return Ok(());
        }
        if self.uow.roles().exists_by_name(name).await? {
            tracing::warn!(role = name, "Rejected duplicate role name");
            return Err(AppError::conflict(format!("Role {}", name)));
        }
        Ok(())
    }

    async fn apply_changes(&self, id: i64, mut changes: RoleChanges) -> AppResult<Role> {
        let current = self.get_role(id).await?;

        if let Some(name) = changes.name.take() {
            let name = normalize_role_name(&name);
            self.ensure_name_free(&name, Some(&current)).await?;
            changes.name = Some(name);
        }
        if let Some(permissions) = changes.permissions.as_ref() {
            permissions.validate()?;
        }

        let role = self.uow.roles().update(id, changes).await?;
        tracing::debug!(role_id = id, "Role updated");
        Ok(role)
    }

    async fn store_permissions(&self, id: i64, permissions: Permissions) -> AppResult<Role> {
        let changes = RoleChanges {
            permissions: Some(permissions),
            ..Default::default()
        };
        self.uow.roles().update(id, changes).await
    }

    fn current_permissions(role: &Role) -> Permissions {
        Permissions::new(role.permissions.clone())
    }
}

#[async_trait]
impl<U: UnitOfWork> RoleService for RoleManager<U> {
    async fn create_role(&self, request: CreateRole) -> AppResult<Role> {
        let name = normalize_role_name(&request.name);
        self.ensure_name_free(&name, None).await?;

        let permissions = Permissions::new(request.permissions);
        permissions.validate()?;

        let role = self
            .uow
            .roles()
            .create(NewRole {
                name,
                description: request.description,
                permissions,
            })
            .await?;

        tracing::info!(role_id = role.id, role = %role.name, "Role created");
        Ok(role)
    }

    async fn get_role(&self, id: i64) -> AppResult<Role> {
        self.uow
            .roles()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Role")
    }

    async fn get_by_name(&self, name: &str) -> AppResult<Role> {
        self.uow
            .roles()
            .find_by_name(&normalize_role_name(name))
            .await?
            .ok_or_not_found("Role")
    }

    async fn get_by_name_ignore_case(&self, name: &str) -> AppResult<Role> {
        self.uow
            .roles()
            .find_by_name_ignore_case(name)
            .await?
            .ok_or_not_found("Role")
    }

    async fn update_role(&self, id: i64, request: UpdateRole) -> AppResult<Role> {
        self.apply_changes(id, request.into()).await
    }

    async fn patch_role(&self, id: i64, request: PatchRole) -> AppResult<Role> {
        self.apply_changes(id, request.into()).await
    }

    async fn delete_role(&self, id: i64) -> AppResult<()> {
        let role = self.get_role(id).await?;

        if PROTECTED_ROLES.contains(&role.name.as_str()) {
            return Err(AppError::invalid_operation(format!(
                "Role {} is protected and cannot be deleted",
                role.name
            )));
        }

        let assignments = self.uow.assignments().count_by_role(id, None).await?;
        if assignments > 0 {
            tracing::warn!(role_id = id, assignments, "Refused to delete role in use");
            return Err(AppError::invalid_operation(format!(
                "Role {} has {} assignments and cannot be deleted",
                role.name, assignments
            )));
        }

        let changes = RoleChanges {
            active: Some(false),
            ..Default::default()
        };
        self.uow.roles().update(id, changes).await?;
        tracing::info!(role_id = id, "Role deactivated");
        Ok(())
    }

    async fn reactivate_role(&self, id: i64) -> AppResult<Role> {
        let changes = RoleChanges {
            active: Some(true),
            ..Default::default()
        };
        self.uow.roles().update(id, changes).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list().await
    }

    async fn list_active_roles(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list_by_active(true).await
    }

    async fn list_inactive_roles(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list_by_active(false).await
    }

    async fn search_by_description(&self, text: &str) -> AppResult<Vec<Role>> {
        if text.trim().is_empty() {
            return Err(AppError::bad_request("search text must not be empty"));
        }
        self.uow.roles().search_by_description(text).await
    }

    async fn roles_with_permission(&self, permission: &str) -> AppResult<Vec<Role>> {
        self.uow.roles().list_by_permission(permission).await
    }

    async fn roles_of_user(&self, user_id: i64) -> AppResult<Vec<Role>> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;
        self.uow.roles().list_for_user(user_id).await
    }

    async fn roles_without_users(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list_without_users().await
    }

    async fn roles_with_min_users(&self, minimum: u64) -> AppResult<Vec<Role>> {
        self.uow.roles().list_with_min_users(minimum).await
    }

    async fn roles_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Role>> {
        if from > to {
            return Err(AppError::bad_request("start date is after end date"));
        }
        self.uow.roles().list_created_between(from, to).await
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.uow
            .roles()
            .exists_by_name(&normalize_role_name(name))
            .await
    }

    async fn exists_active_by_name(&self, name: &str) -> AppResult<bool> {
        self.uow
            .roles()
            .exists_active_by_name(&normalize_role_name(name))
            .await
    }

    async fn can_delete(&self, id: i64) -> AppResult<bool> {
        let Some(role) = self.uow.roles().find_by_id(id).await? else {
            return Ok(false);
        };
        if PROTECTED_ROLES.contains(&role.name.as_str()) {
            return Ok(false);
        }
        Ok(self.uow.assignments().count_by_role(id, None).await? == 0)
    }

    async fn has_permission(&self, id: i64, permission: &str) -> AppResult<bool> {
        let role = self.get_role(id).await?;
        Ok(role.has_permission(permission))
    }

    async fn get_permissions(&self, id: i64) -> AppResult<Vec<String>> {
        Ok(self.get_role(id).await?.permissions)
    }

    async fn set_permissions(&self, id: i64, permissions: Vec<String>) -> AppResult<Role> {
        self.get_role(id).await?;

        let permissions = Permissions::new(permissions);
        permissions.validate()?;
        self.store_permissions(id, permissions).await
    }

    async fn add_permission(&self, id: i64, permission: &str) -> AppResult<Role> {
        let role = self.get_role(id).await?;
        let current = Self::current_permissions(&role);

        if current.contains(permission) {
            return Err(AppError::conflict(format!(
                "Permission {} on role {}",
                permission, role.name
            )));
        }

        let mut list = current.into_vec();
        list.push(permission.to_string());
        let updated = Permissions::new(list);
        updated.validate()?;
        self.store_permissions(id, updated).await
    }

    async fn remove_permission(&self, id: i64, permission: &str) -> AppResult<Role> {
        let role = self.get_role(id).await?;
        let current = Self::current_permissions(&role);

        if !current.contains(permission) {
            return Err(AppError::not_found(format!(
                "Permission {} on role {}",
                permission, role.name
            )));
        }

        let remaining = current
            .into_vec()
            .into_iter()
            .filter(|p| p != permission)
            .collect();
        self.store_permissions(id, Permissions::new(remaining)).await
    }

    async fn users_with_role(&self, id: i64) -> AppResult<Vec<User>> {
        let role = self.get_role(id).await?;
        self.uow.users().list_by_role(&role.name).await
    }

    async fn count_users_with_role(&self, id: i64) -> AppResult<u64> {
        self.get_role(id).await?;
        self.uow.assignments().count_by_role(id, Some(true)).await
    }

    async fn statistics(&self) -> AppResult<RoleStatistics> {
        let roles = self.uow.roles();
        let (total, active, inactive, users_by_role) = futures::try_join!(
            roles.count(None),
            roles.count(Some(true)),
            roles.count(Some(false)),
            roles.user_counts_by_name(),
        )?;

        Ok(RoleStatistics {
            total,
            active,
            inactive,
            users_by_role,
        })
    }

    async fn initialize_default_roles(&self) -> AppResult<Vec<Role>> {
        let roles = self.uow.roles();
        let mut created = Vec::new();

        for (name, permissions) in DEFAULT_ROLES {
            if roles.exists_by_name(name).await? {
                continue;
            }

            let role = roles
                .create(NewRole {
                    name: name.to_string(),
                    description: role_description(name).map(str::to_string),
                    permissions: Permissions::new(
                        permissions.iter().map(|p| p.to_string()).collect(),
                    ),
                })
                .await?;
            created.push(role);
        }

        tracing::info!(created = created.len(), "Default roles initialized");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ROLE_ADMIN, ROLE_GUARD};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockAssignmentRepository, MockRoleRepository};
    use mockall::predicate::eq;

    fn test_role(id: i64, name: &str, permissions: &[&str]) -> Role {
        let now = Utc::now();
        Role {
            id,
            name: name.to_string(),
            description: None,
            active: true,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            number_of_users: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        roles: MockRoleRepository,
        assignments: MockAssignmentRepository,
    ) -> RoleManager<TestUnitOfWork> {
        let uow = TestUnitOfWork::new()
            .with_roles(roles)
            .with_assignments(assignments)
            .into_arc();
        RoleManager::new(uow)
    }

    #[tokio::test]
    async fn test_create_role_uppercases_name() {
        let mut roles = MockRoleRepository::new();
        roles.expect_exists_by_name()
            .with(eq("CONSERJE"))
            .returning(|_| Ok(false));
        roles.expect_create()
            .withf(|r| r.name == "CONSERJE")
            .returning(|r| Ok(test_role(9, &r.name, &[])));

        let request = CreateRole {
            name: "conserje".to_string(),
            description: None,
            permissions: vec![],
        };
        let role = service(roles, MockAssignmentRepository::new())
            .create_role(request)
            .await
            .unwrap();

        assert_eq!(role.name, "CONSERJE");
    }

    #[tokio::test]
    async fn test_create_role_duplicate_name_is_conflict() {
        let mut roles = MockRoleRepository::new();
        roles.expect_exists_by_name().returning(|_| Ok(true));
        roles.expect_create().never();

        let request = CreateRole {
            name: "VIGILANTE".to_string(),
            description: None,
            permissions: vec![],
        };
        let result = service(roles, MockAssignmentRepository::new())
            .create_role(request)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_role_rejects_unknown_permission() {
        let mut roles = MockRoleRepository::new();
        roles.expect_exists_by_name().returning(|_| Ok(false));
        roles.expect_create().never();

        let request = CreateRole {
            name: "JARDINERO".to_string(),
            description: None,
            permissions: vec!["WATER_PLANTS".to_string()],
        };
        let result = service(roles, MockAssignmentRepository::new())
            .create_role(request)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_role_with_assignments_is_rejected() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, ROLE_GUARD, &[]))));
        roles.expect_update().never();

        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_count_by_role()
            .with(eq(4), eq(None::<bool>))
            .returning(|_, _| Ok(2));

        let result = service(roles, assignments).delete_role(4).await;

        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn test_delete_unused_role_deactivates_it() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, "JARDINERO", &[]))));
        roles.expect_update()
            .withf(|id, changes| *id == 8 && changes.active == Some(false))
            .times(1)
            .returning(|id, _| Ok(test_role(id, "JARDINERO", &[])));

        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_count_by_role().returning(|_, _| Ok(0));

        assert!(service(roles, assignments).delete_role(8).await.is_ok());
    }

    #[tokio::test]
    async fn test_protected_role_cannot_be_deleted() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, ROLE_ADMIN, &["ALL_PERMISSIONS"]))));

        let can = service(roles, MockAssignmentRepository::new())
            .can_delete(1)
            .await
            .unwrap();

        assert!(!can);
    }

    #[tokio::test]
    async fn test_has_permission_is_exact() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, ROLE_GUARD, &["READ_USERS"]))));

        let roles = service(roles, MockAssignmentRepository::new());

        assert!(roles.has_permission(2, "READ_USERS").await.unwrap());
        assert!(!roles.has_permission(2, "READ_USER").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_existing_permission_is_conflict() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, ROLE_GUARD, &["MANAGE_ACCESS"]))));
        roles.expect_update().never();

        let result = service(roles, MockAssignmentRepository::new())
            .add_permission(2, "MANAGE_ACCESS")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_remove_missing_permission_is_not_found() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, ROLE_GUARD, &["MANAGE_ACCESS"]))));

        let result = service(roles, MockAssignmentRepository::new())
            .remove_permission(2, "READ_VISITORS")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initialize_skips_existing_roles() {
        let mut roles = MockRoleRepository::new();
        roles.expect_exists_by_name()
            .returning(|name| Ok(name == ROLE_ADMIN));
        roles.expect_create()
            .times(DEFAULT_ROLES.len() - 1)
            .returning(|r| Ok(test_role(1, &r.name, &[])));

        let created = service(roles, MockAssignmentRepository::new())
            .initialize_default_roles()
            .await
            .unwrap();

        assert_eq!(created.len(), DEFAULT_ROLES.len() - 1);
        assert!(created.iter().all(|r| r.name != ROLE_ADMIN));
    }
}
