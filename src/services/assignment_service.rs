//! Role assignment service - Links users to roles.
//!
//! Single-pair operations go straight to the repository. Bulk operations
//! and role replacement validate every item up front and then write inside
//! one transaction, so a rejected item leaves nothing half-applied.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::ROLE_ADMIN;
use crate::domain::{
    normalize_role_name, AssignmentPolicy, AssignmentStats, CreateAssignment, RoleAssignment,
    UpdateAssignment,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Assignment service trait for dependency injection.
#[async_trait]
pub trait AssignmentService: Send + Sync {
    async fn create(&self, request: CreateAssignment) -> AppResult<RoleAssignment>;

    /// Activate the pair; an inactive row is reused
    async fn assign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    async fn get(&self, id: i64) -> AppResult<RoleAssignment>;

    async fn get_by_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    async fn get_active_by_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    async fn update(&self, id: i64, request: UpdateAssignment) -> AppResult<RoleAssignment>;

    /// Hard delete
    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn activate(&self, id: i64) -> AppResult<RoleAssignment>;

    async fn deactivate(&self, id: i64) -> AppResult<RoleAssignment>;

    async fn activate_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    async fn deactivate_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    /// Deactivate the pair if `can_unassign` allows it
    async fn unassign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    async fn list(&self) -> AppResult<Vec<RoleAssignment>>;

    async fn list_active(&self) -> AppResult<Vec<RoleAssignment>>;

    async fn list_inactive(&self) -> AppResult<Vec<RoleAssignment>>;

    async fn list_by_user(&self, user_id: i64, active_only: bool) -> AppResult<Vec<RoleAssignment>>;

    async fn list_by_role(&self, role_id: i64, active_only: bool) -> AppResult<Vec<RoleAssignment>>;

    async fn created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn updated_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn user_has_role(&self, user_id: i64, role_id: i64) -> AppResult<bool>;

    async fn user_has_role_name(&self, user_id: i64, role_name: &str) -> AppResult<bool>;

    /// Any row for the pair, active or not
    async fn exists(&self, user_id: i64, role_id: i64) -> AppResult<bool>;

    async fn exists_active(&self, user_id: i64, role_id: i64) -> AppResult<bool>;

    async fn can_assign(&self, user_id: i64, role_id: i64) -> AppResult<bool>;

    async fn can_unassign(&self, user_id: i64, role_id: i64) -> AppResult<bool>;

    async fn assign_roles_to_user(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn unassign_roles_from_user(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn assign_role_to_users(
        &self,
        role_id: i64,
        user_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn unassign_role_from_users(
        &self,
        role_id: i64,
        user_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>>;

    /// Make the user's active roles equal to `role_ids`, keeping roles that
    /// cannot be unassigned. Returns the resulting active assignments.
    async fn replace_user_roles(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn count(&self, active: Option<bool>) -> AppResult<u64>;

    async fn count_active_roles_of_user(&self, user_id: i64) -> AppResult<u64>;

    async fn count_active_users_of_role(&self, role_id: i64) -> AppResult<u64>;

    async fn statistics(&self) -> AppResult<AssignmentStats>;

    /// Every row of the user, newest first
    async fn user_history(&self, user_id: i64) -> AppResult<Vec<RoleAssignment>>;

    /// Every row of the role, newest first
    async fn role_history(&self, role_id: i64) -> AppResult<Vec<RoleAssignment>>;

    fn policy(&self) -> AssignmentPolicy;
}

/// Concrete implementation of AssignmentService using Unit of Work.
pub struct AssignmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

/// Role ids to unassign and to assign when replacing a user's roles
#[derive(Debug, PartialEq)]
struct RoleReplacement {
    remove: Vec<i64>,
    add: Vec<i64>,
}

/// Drop repeated ids, keeping the first occurrence
fn distinct(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl<U: UnitOfWork> AssignmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_user(&self, user_id: i64) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")
            .map(|_| ())
    }

    async fn ensure_role(&self, role_id: i64) -> AppResult<()> {
        self.uow
            .roles()
            .find_by_id(role_id)
            .await?
            .ok_or_not_found("Role")
            .map(|_| ())
    }

    async fn check_assignable(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        if !self.can_assign(user_id, role_id).await? {
            tracing::warn!(user_id, role_id, "Rejected bulk assignment");
            return Err(AppError::invalid_operation(format!(
                "Cannot assign role {} to user {}",
                role_id, user_id
            )));
        }
        Ok(())
    }

    /// Work out which active roles to drop and which to add. Roles that may
    /// not be removed, such as the last administrator, are kept.
    async fn plan_replacement(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<RoleReplacement> {
        self.ensure_user(user_id).await?;
        let wanted: BTreeSet<i64> = role_ids.into_iter().collect();

        let current = self.uow.assignments().list_by_user(user_id, true).await?;
        let held: BTreeSet<i64> = current.iter().map(|a| a.role_id).collect();

        let mut remove = Vec::new();
        for assignment in current.iter().filter(|a| !wanted.contains(&a.role_id)) {
            if self.can_unassign(user_id, assignment.role_id).await? {
                remove.push(assignment.role_id);
            } else {
                tracing::debug!(user_id, role_id = assignment.role_id, "Keeping role");
            }
        }

        let add: Vec<i64> = wanted.difference(&held).copied().collect();
        for role_id in &add {
            self.check_assignable(user_id, *role_id).await?;
        }

        Ok(RoleReplacement { remove, add })
    }

    async fn check_unassignable(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        if !self.can_unassign(user_id, role_id).await? {
            tracing::warn!(user_id, role_id, "Rejected role removal");
            return Err(AppError::invalid_operation(format!(
                "Cannot remove role {} from user {}",
                role_id, user_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> AssignmentService for AssignmentManager<U> {
    async fn create(&self, request: CreateAssignment) -> AppResult<RoleAssignment> {
        self.assign(request.user_id, request.role_id).await
    }

    async fn assign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        self.ensure_user(user_id).await?;
        self.ensure_role(role_id).await?;

        let assignments = self.uow.assignments();
        if assignments
            .find_active_by_pair(user_id, role_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Active assignment of role {} to user {}",
                role_id, user_id
            )));
        }

        let assignment = assignments.assign(user_id, role_id).await?;
        tracing::info!(user_id, role_id, assignment_id = assignment.id, "Role assigned");
        Ok(assignment)
    }

    async fn get(&self, id: i64) -> AppResult<RoleAssignment> {
        self.uow
            .assignments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Role assignment")
    }

    async fn get_by_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        self.uow
            .assignments()
            .find_by_pair(user_id, role_id)
            .await?
            .ok_or_not_found("Role assignment")
    }

    async fn get_active_by_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        self.uow
            .assignments()
            .find_active_by_pair(user_id, role_id)
            .await?
            .ok_or_not_found("Active role assignment")
    }

    async fn update(&self, id: i64, request: UpdateAssignment) -> AppResult<RoleAssignment> {
        self.uow.assignments().set_active(id, request.active).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.assignments().delete(id).await?;
        tracing::info!(assignment_id = id, "Role assignment deleted");
        Ok(())
    }

    async fn activate(&self, id: i64) -> AppResult<RoleAssignment> {
        self.uow.assignments().set_active(id, true).await
    }

    async fn deactivate(&self, id: i64) -> AppResult<RoleAssignment> {
        self.uow.assignments().set_active(id, false).await
    }

    async fn activate_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        let existing = self.get_by_pair(user_id, role_id).await?;
        if existing.active {
            return Ok(existing);
        }
        self.uow.assignments().set_active(existing.id, true).await
    }

    async fn deactivate_pair(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        let existing = self.get_active_by_pair(user_id, role_id).await?;
        self.uow.assignments().set_active(existing.id, false).await
    }

    async fn unassign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        let existing = self.get_active_by_pair(user_id, role_id).await?;
        self.check_unassignable(user_id, role_id).await?;

        let assignment = self.uow.assignments().set_active(existing.id, false).await?;
        tracing::info!(user_id, role_id, "Role unassigned");
        Ok(assignment)
    }

    async fn list(&self) -> AppResult<Vec<RoleAssignment>> {
        self.uow.assignments().list().await
    }

    async fn list_active(&self) -> AppResult<Vec<RoleAssignment>> {
        self.uow.assignments().list_by_active(true).await
    }

    async fn list_inactive(&self) -> AppResult<Vec<RoleAssignment>> {
        self.uow.assignments().list_by_active(false).await
    }

    async fn list_by_user(&self, user_id: i64, active_only: bool) -> AppResult<Vec<RoleAssignment>> {
        self.ensure_user(user_id).await?;
        self.uow.assignments().list_by_user(user_id, active_only).await
    }

    async fn list_by_role(&self, role_id: i64, active_only: bool) -> AppResult<Vec<RoleAssignment>> {
        self.ensure_role(role_id).await?;
        self.uow.assignments().list_by_role(role_id, active_only).await
    }

    async fn created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>> {
        if from > to {
            return Err(AppError::bad_request("start date is after end date"));
        }
        self.uow.assignments().list_created_between(from, to).await
    }

    async fn updated_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>> {
        if from > to {
            return Err(AppError::bad_request("start date is after end date"));
        }
        self.uow.assignments().list_updated_between(from, to).await
    }

    async fn user_has_role(&self, user_id: i64, role_id: i64) -> AppResult<bool> {
        self.exists_active(user_id, role_id).await
    }

    async fn user_has_role_name(&self, user_id: i64, role_name: &str) -> AppResult<bool> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;
        Ok(user.has_role(&normalize_role_name(role_name)))
    }

    async fn exists(&self, user_id: i64, role_id: i64) -> AppResult<bool> {
        Ok(self
            .uow
            .assignments()
            .find_by_pair(user_id, role_id)
            .await?
            .is_some())
    }

    async fn exists_active(&self, user_id: i64, role_id: i64) -> AppResult<bool> {
        Ok(self
            .uow
            .assignments()
            .find_active_by_pair(user_id, role_id)
            .await?
            .is_some())
    }

    async fn can_assign(&self, user_id: i64, role_id: i64) -> AppResult<bool> {
        let user_active = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .is_some_and(|u| u.active);
        if !user_active {
            return Ok(false);
        }

        let role_active = self
            .uow
            .roles()
            .find_by_id(role_id)
            .await?
            .is_some_and(|r| r.active);
        if !role_active {
            return Ok(false);
        }

        Ok(!self.exists_active(user_id, role_id).await?)
    }

    async fn can_unassign(&self, user_id: i64, role_id: i64) -> AppResult<bool> {
        let assignments = self.uow.assignments();
        let Some(current) = assignments.find_active_by_pair(user_id, role_id).await? else {
            return Ok(false);
        };

        if current.role_name.as_deref() == Some(ROLE_ADMIN) {
            let admins = assignments.count_by_role(role_id, Some(true)).await?;
            return Ok(admins > 1);
        }
        Ok(true)
    }

    async fn assign_roles_to_user(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.ensure_user(user_id).await?;
        let role_ids = distinct(role_ids);
        for role_id in &role_ids {
            self.check_assignable(user_id, *role_id).await?;
        }

        let created = with_transaction!(self.uow, |ctx| {
            let tx = ctx.assignments();
            let mut created = Vec::with_capacity(role_ids.len());
            for role_id in role_ids {
                created.push(tx.assign(user_id, role_id).await?);
            }
            Ok(created)
        })?;

        tracing::info!(user_id, count = created.len(), "Roles assigned to user");
        Ok(created)
    }

    async fn unassign_roles_from_user(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.ensure_user(user_id).await?;
        let role_ids = distinct(role_ids);
        for role_id in &role_ids {
            self.check_unassignable(user_id, *role_id).await?;
        }

        let removed = with_transaction!(self.uow, |ctx| {
            let tx = ctx.assignments();
            let mut removed = Vec::with_capacity(role_ids.len());
            for role_id in role_ids {
                removed.push(tx.unassign(user_id, role_id).await?);
            }
            Ok(removed)
        })?;

        tracing::info!(user_id, count = removed.len(), "Roles removed from user");
        Ok(removed)
    }

    async fn assign_role_to_users(
        &self,
        role_id: i64,
        user_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.ensure_role(role_id).await?;
        let user_ids = distinct(user_ids);
        for user_id in &user_ids {
            self.check_assignable(*user_id, role_id).await?;
        }

        let created = with_transaction!(self.uow, |ctx| {
            let tx = ctx.assignments();
            let mut created = Vec::with_capacity(user_ids.len());
            for user_id in user_ids {
                created.push(tx.assign(user_id, role_id).await?);
            }
            Ok(created)
        })?;

        tracing::info!(role_id, count = created.len(), "Role assigned to users");
        Ok(created)
    }

    async fn unassign_role_from_users(
        &self,
        role_id: i64,
        user_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>> {
        let role = self
            .uow
            .roles()
            .find_by_id(role_id)
            .await?
            .ok_or_not_found("Role")?;
        let user_ids = distinct(user_ids);
        for user_id in &user_ids {
            self.check_unassignable(*user_id, role_id).await?;
        }

        // One administrator has to remain after the whole batch
        if role.name == ROLE_ADMIN {
            let admins = self.uow.assignments().count_by_role(role_id, Some(true)).await?;
            if admins <= user_ids.len() as u64 {
                return Err(AppError::invalid_operation(
                    "At least one administrator must remain",
                ));
            }
        }

        let removed = with_transaction!(self.uow, |ctx| {
            let tx = ctx.assignments();
            let mut removed = Vec::with_capacity(user_ids.len());
            for user_id in user_ids {
                removed.push(tx.unassign(user_id, role_id).await?);
            }
            Ok(removed)
        })?;

        tracing::info!(role_id, count = removed.len(), "Role removed from users");
        Ok(removed)
    }

    async fn replace_user_roles(
        &self,
        user_id: i64,
        role_ids: Vec<i64>,
    ) -> AppResult<Vec<RoleAssignment>> {
        let RoleReplacement { remove, add } = self.plan_replacement(user_id, role_ids).await?;

        with_transaction!(self.uow, |ctx| {
            let tx = ctx.assignments();
            for role_id in remove {
                tx.unassign(user_id, role_id).await?;
            }
            for role_id in add {
                tx.assign(user_id, role_id).await?;
            }
            Ok(())
        })?;

        tracing::info!(user_id, "User roles replaced");
        self.uow.assignments().list_by_user(user_id, true).await
    }

    async fn count(&self, active: Option<bool>) -> AppResult<u64> {
        self.uow.assignments().count(active).await
    }

    async fn count_active_roles_of_user(&self, user_id: i64) -> AppResult<u64> {
        self.uow.assignments().count_by_user(user_id, Some(true)).await
    }

    async fn count_active_users_of_role(&self, role_id: i64) -> AppResult<u64> {
        self.uow.assignments().count_by_role(role_id, Some(true)).await
    }

    async fn statistics(&self) -> AppResult<AssignmentStats> {
        let assignments = self.uow.assignments();
        let roles = self.uow.roles();
        let (total, active, inactive, by_role, by_user) = futures::try_join!(
            assignments.count(None),
            assignments.count(Some(true)),
            assignments.count(Some(false)),
            roles.user_counts_by_name(),
            assignments.active_counts_by_user(),
        )?;

        Ok(AssignmentStats {
            total,
            active,
            inactive,
            by_role,
            by_user: by_user
                .into_iter()
                .map(|(user_id, count)| (user_id.to_string(), count))
                .collect(),
        })
    }

    async fn user_history(&self, user_id: i64) -> AppResult<Vec<RoleAssignment>> {
        self.list_by_user(user_id, false).await
    }

    async fn role_history(&self, role_id: i64) -> AppResult<Vec<RoleAssignment>> {
        self.list_by_role(role_id, false).await
    }

    fn policy(&self) -> AssignmentPolicy {
        AssignmentPolicy::from_constants()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::domain::{DocumentType, Role, User};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockAssignmentRepository, MockRoleRepository, MockUserRepository};
    use mockall::predicate::eq;

    fn test_user(id: i64, active: bool) -> User {
        let now = Utc::now();
        User {
            id,
            document_type: DocumentType::Cc,
            document_number: format!("10000{}", id),
            first_names: "Laura".to_string(),
            last_names: "Gómez".to_string(),
            email: format!("user{}@arkania.co", id),
            phone: None,
            password_hash: "hash".to_string(),
            active,
            roles: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn test_role(id: i64, name: &str) -> Role {
        let now = Utc::now();
        Role {
            id,
            name: name.to_string(),
            description: None,
            active: true,
            permissions: vec![],
            number_of_users: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_assignment(id: i64, user_id: i64, role_id: i64, role: &str, active: bool) -> RoleAssignment {
        let now = Utc::now();
        RoleAssignment {
            id,
            user_id,
            role_id,
            active,
            created_at: now,
            updated_at: now,
            user_document_number: None,
            user_full_name: None,
            role_name: Some(role.to_string()),
        }
    }

    fn service(
        users: MockUserRepository,
        roles: MockRoleRepository,
        assignments: MockAssignmentRepository,
    ) -> AssignmentManager<TestUnitOfWork> {
        let uow = TestUnitOfWork::new()
            .with_users(users)
            .with_roles(roles)
            .with_assignments(assignments)
            .into_arc();
        AssignmentManager::new(uow)
    }

    fn existing_user_and_role() -> (MockUserRepository, MockRoleRepository) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, true))));
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| Ok(Some(test_role(id, "PROPIETARIO"))));
        (users, roles)
    }

    #[tokio::test]
    async fn test_assign_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_assign().never();

        let result = service(users, MockRoleRepository::new(), assignments)
            .assign(99, 2)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_active_pair_is_conflict() {
        let (users, roles) = existing_user_and_role();
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_find_active_by_pair()
            .with(eq(1), eq(2))
            .returning(|u, r| Ok(Some(test_assignment(5, u, r, "PROPIETARIO", true))));
        assignments.expect_assign().never();

        let result = service(users, roles, assignments).assign(1, 2).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_assign_new_pair() {
        let (users, roles) = existing_user_and_role();
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_find_active_by_pair().returning(|_, _| Ok(None));
        assignments.expect_assign()
            .with(eq(1), eq(2))
            .times(1)
            .returning(|u, r| Ok(test_assignment(7, u, r, "PROPIETARIO", true)));

        let assignment = service(users, roles, assignments).assign(1, 2).await.unwrap();

        assert_eq!(assignment.id, 7);
        assert!(assignment.active);
    }

    #[tokio::test]
    async fn test_deactivated_pair_comes_back_when_reactivated() {
        let active = Arc::new(AtomicBool::new(true));
        let mut assignments = MockAssignmentRepository::new();

        let state = active.clone();
        assignments.expect_find_active_by_pair()
            .returning(move |u, r| {
                Ok(state
                    .load(Ordering::SeqCst)
                    .then(|| test_assignment(3, u, r, "PROPIETARIO", true)))
            });
        let state = active.clone();
        assignments.expect_find_by_pair()
            .returning(move |u, r| {
                Ok(Some(test_assignment(3, u, r, "PROPIETARIO", state.load(Ordering::SeqCst))))
            });
        let state = active.clone();
        assignments.expect_set_active()
            .returning(move |id, flag| {
                state.store(flag, Ordering::SeqCst);
                Ok(test_assignment(id, 1, 2, "PROPIETARIO", flag))
            });
        let state = active.clone();
        assignments.expect_list_by_user()
            .with(eq(1), eq(true))
            .returning(move |u, _| {
                Ok(if state.load(Ordering::SeqCst) {
                    vec![test_assignment(3, u, 2, "PROPIETARIO", true)]
                } else {
                    vec![]
                })
            });

        let (users, roles) = existing_user_and_role();
        let service = service(users, roles, assignments);

        service.deactivate_pair(1, 2).await.unwrap();
        assert!(service.list_by_user(1, true).await.unwrap().is_empty());

        service.activate_pair(1, 2).await.unwrap();
        let active_roles = service.list_by_user(1, true).await.unwrap();
        assert_eq!(active_roles.len(), 1);
        assert_eq!(active_roles[0].role_id, 2);
    }

    #[tokio::test]
    async fn test_last_administrator_cannot_be_unassigned() {
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_find_active_by_pair()
            .returning(|u, r| Ok(Some(test_assignment(1, u, r, ROLE_ADMIN, true))));
        assignments.expect_count_by_role()
            .with(eq(1), eq(Some(true)))
            .returning(|_, _| Ok(1));
        assignments.expect_set_active().never();

        let service = service(MockUserRepository::new(), MockRoleRepository::new(), assignments);

        assert!(!service.can_unassign(4, 1).await.unwrap());
        assert!(matches!(
            service.unassign(4, 1).await,
            Err(AppError::InvalidOperation(_))
        ));
    }

    #[tokio::test]
    async fn test_can_assign_requires_active_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, false))));

        let can = service(users, MockRoleRepository::new(), MockAssignmentRepository::new())
            .can_assign(1, 2)
            .await
            .unwrap();

        assert!(!can);
    }

    #[tokio::test]
    async fn test_bulk_assign_aborts_on_first_invalid_item() {
        let (users, roles) = existing_user_and_role();
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_find_active_by_pair()
            .returning(|u, r| {
                Ok((r == 3).then(|| test_assignment(9, u, r, "VIGILANTE", true)))
            });
        assignments.expect_assign().never();

        let result = service(users, roles, assignments)
            .assign_roles_to_user(1, vec![2, 3, 4])
            .await;

        match result {
            Err(AppError::InvalidOperation(msg)) => assert!(msg.contains("role 3")),
            other => panic!("expected invalid operation, got {:?}", other),
        }
    }

    fn role_named(id: i64) -> &'static str {
        match id {
            1 => ROLE_ADMIN,
            2 => "PROPIETARIO",
            _ => "VIGILANTE",
        }
    }

    #[tokio::test]
    async fn test_replace_keeps_last_admin_and_adds_missing_roles() {
        let (users, roles) = existing_user_and_role();
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_list_by_user()
            .with(eq(1), eq(true))
            .returning(|u, _| {
                Ok(vec![
                    test_assignment(10, u, 1, ROLE_ADMIN, true),
                    test_assignment(11, u, 2, "PROPIETARIO", true),
                    test_assignment(12, u, 4, "VIGILANTE", true),
                ])
            });
        assignments.expect_find_active_by_pair()
            .returning(|u, r| {
                Ok((r != 3).then(|| test_assignment(20 + r, u, r, role_named(r), true)))
            });
        assignments.expect_count_by_role()
            .with(eq(1), eq(Some(true)))
            .returning(|_, _| Ok(1));
        assignments.expect_assign().never();
        assignments.expect_set_active().never();

        let plan = service(users, roles, assignments)
            .plan_replacement(1, vec![2, 3])
            .await
            .unwrap();

        assert_eq!(
            plan,
            RoleReplacement {
                remove: vec![4],
                add: vec![3],
            }
        );
    }

    #[tokio::test]
    async fn test_replace_rejects_unassignable_new_role_before_writing() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, true))));
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .returning(|id| {
                let mut role = test_role(id, "VIGILANTE");
                role.active = id != 3;
                Ok(Some(role))
            });
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_list_by_user()
            .returning(|u, _| Ok(vec![test_assignment(11, u, 2, "PROPIETARIO", true)]));
        assignments.expect_find_active_by_pair().returning(|_, _| Ok(None));
        assignments.expect_assign().never();
        assignments.expect_set_active().never();

        let result = service(users, roles, assignments)
            .replace_user_roles(1, vec![2, 3])
            .await;

        match result {
            Err(AppError::InvalidOperation(msg)) => assert!(msg.contains("role 3")),
            other => panic!("expected invalid operation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bulk_unassign_keeps_one_administrator() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(test_role(id, ROLE_ADMIN))));
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_find_active_by_pair()
            .returning(|u, r| Ok(Some(test_assignment(30 + u, u, r, ROLE_ADMIN, true))));
        assignments.expect_count_by_role()
            .with(eq(1), eq(Some(true)))
            .returning(|_, _| Ok(2));
        assignments.expect_set_active().never();

        let service = service(MockUserRepository::new(), roles, assignments);

        // Each holder alone could go, but not both of them
        assert!(service.can_unassign(4, 1).await.unwrap());
        assert!(matches!(
            service.unassign_role_from_users(1, vec![4, 5]).await,
            Err(AppError::InvalidOperation(_))
        ));

        // Repeated ids count once, so this batch passes the guard and reaches the write
        assert!(matches!(
            service.unassign_role_from_users(1, vec![4, 4]).await,
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        assert_eq!(distinct(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
