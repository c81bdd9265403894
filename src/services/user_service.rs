//! User service - Resident and staff account use cases.
//!
//! Deleting a user only clears its `active` flag; the account stays
//! retrievable by id and can be reactivated.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::ROLE_ADMIN;
use crate::domain::{
    ChangePassword, CreateUser, NewUser, Password, PatchUser, ResetPassword, UpdateUser, User,
    UserChanges, UserStatistics,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, request: CreateUser) -> AppResult<User>;

    /// Get user by ID, active or not
    async fn get_user(&self, id: i64) -> AppResult<User>;

    async fn get_by_document(&self, document_number: &str) -> AppResult<User>;

    async fn get_by_email(&self, email: &str) -> AppResult<User>;

    /// Replace every editable field
    async fn update_user(&self, id: i64, request: UpdateUser) -> AppResult<User>;

    /// Change only the fields present in the request
    async fn patch_user(&self, id: i64, request: PatchUser) -> AppResult<User>;

    /// Soft delete (clears the active flag)
    async fn delete_user(&self, id: i64) -> AppResult<()>;

    async fn reactivate_user(&self, id: i64) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn list_active_users(&self) -> AppResult<Vec<User>>;

    async fn list_inactive_users(&self) -> AppResult<Vec<User>>;

    async fn search_users(&self, term: &str) -> AppResult<Vec<User>>;

    async fn users_by_role(&self, role_name: &str) -> AppResult<Vec<User>>;

    async fn users_without_roles(&self) -> AppResult<Vec<User>>;

    async fn users_with_multiple_roles(&self) -> AppResult<Vec<User>>;

    async fn users_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<User>>;

    async fn exists_by_document(&self, document_number: &str) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// False for unknown users and for the last active administrator
    async fn can_delete(&self, id: i64) -> AppResult<bool>;

    async fn change_password(&self, id: i64, request: ChangePassword) -> AppResult<()>;

    /// Administrative reset, no current password required
    async fn reset_password(&self, id: i64, request: ResetPassword) -> AppResult<()>;

    async fn statistics(&self) -> AppResult<UserStatistics>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Reject changes that would reuse another user's document or email.
    async fn ensure_unique(&self, current: &User, changes: &UserChanges) -> AppResult<()> {
        let users = self.uow.users();

        if let Some(document) = changes.document_number.as_deref() {
            if document != current.document_number && users.exists_by_document(document).await? {
                return Err(AppError::conflict(format!(
                    "User with document number {}",
                    document
                )));
            }
        }
        if let Some(email) = changes.email.as_deref() {
            if email != current.email && users.exists_by_email(email).await? {
                return Err(AppError::conflict(format!("User with email {}", email)));
            }
        }
        Ok(())
    }

    async fn apply_changes(
        &self,
        id: i64,
        mut changes: UserChanges,
        password: Option<String>,
    ) -> AppResult<User> {
        let current = self.get_user(id).await?;
        self.ensure_unique(&current, &changes).await?;

        if let Some(plain) = password {
            changes.password_hash = Some(Password::new(&plain)?.into_string());
        }

        let user = self.uow.users().update(id, changes).await?;
        tracing::debug!(user_id = id, "User updated");
        Ok(user)
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<User> {
        let changes = UserChanges {
            active: Some(active),
            ..Default::default()
        };
        self.uow.users().update(id, changes).await
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        let users = self.uow.users();

        if users.exists_by_document(&request.document_number).await? {
            tracing::warn!("Rejected user with duplicate document number");
            return Err(AppError::conflict(format!(
                "User with document number {}",
                request.document_number
            )));
        }
        if users.exists_by_email(&request.email).await? {
            tracing::warn!("Rejected user with duplicate email");
            return Err(AppError::conflict(format!(
                "User with email {}",
                request.email
            )));
        }

        let password_hash = Password::new(&request.password)?.into_string();
        let user = users
            .create(NewUser {
                document_type: request.document_type,
                document_number: request.document_number,
                first_names: request.first_names,
                last_names: request.last_names,
                email: request.email,
                phone: request.phone,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn get_by_document(&self, document_number: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_document(document_number)
            .await?
            .ok_or_not_found("User")
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_user(&self, id: i64, request: UpdateUser) -> AppResult<User> {
        let (changes, password) = request.into_changes();
        self.apply_changes(id, changes, password).await
    }

    async fn patch_user(&self, id: i64, request: PatchUser) -> AppResult<User> {
        let (changes, password) = request.into_changes();
        self.apply_changes(id, changes, password).await
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.set_active(id, false).await?;
        tracing::info!(user_id = id, "User deactivated");
        Ok(())
    }

    async fn reactivate_user(&self, id: i64) -> AppResult<User> {
        let user = self.set_active(id, true).await?;
        tracing::info!(user_id = id, "User reactivated");
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn list_active_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list_by_active(true).await
    }

    async fn list_inactive_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list_by_active(false).await
    }

    async fn search_users(&self, term: &str) -> AppResult<Vec<User>> {
        if term.trim().is_empty() {
            return Err(AppError::bad_request("search term must not be empty"));
        }
        self.uow.users().search_by_name(term).await
    }

    async fn users_by_role(&self, role_name: &str) -> AppResult<Vec<User>> {
        self.uow
            .users()
            .list_by_role(&role_name.trim().to_uppercase())
            .await
    }

    async fn users_without_roles(&self) -> AppResult<Vec<User>> {
        self.uow.users().list_without_roles().await
    }

    async fn users_with_multiple_roles(&self) -> AppResult<Vec<User>> {
        self.uow.users().list_with_multiple_roles().await
    }

    async fn users_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<User>> {
        if from > to {
            return Err(AppError::bad_request("start date is after end date"));
        }
        self.uow.users().list_created_between(from, to).await
    }

    async fn exists_by_document(&self, document_number: &str) -> AppResult<bool> {
        self.uow.users().exists_by_document(document_number).await
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        self.uow.users().exists_by_email(email).await
    }

    async fn can_delete(&self, id: i64) -> AppResult<bool> {
        let Some(user) = self.uow.users().find_by_id(id).await? else {
            return Ok(false);
        };

        if user.has_role(ROLE_ADMIN) {
            let admins = self.uow.users().list_by_role(ROLE_ADMIN).await?;
            return Ok(admins.len() > 1);
        }
        Ok(true)
    }

    async fn change_password(&self, id: i64, request: ChangePassword) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if !Password::from_hash(user.password_hash.as_str()).verify(&request.current_password) {
            return Err(AppError::validation("Current password is incorrect"));
        }

        let changes = UserChanges {
            password_hash: Some(Password::new(&request.new_password)?.into_string()),
            ..Default::default()
        };
        self.uow.users().update(id, changes).await?;
        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    async fn reset_password(&self, id: i64, request: ResetPassword) -> AppResult<()> {
        self.get_user(id).await?;

        let changes = UserChanges {
            password_hash: Some(Password::new(&request.new_password)?.into_string()),
            ..Default::default()
        };
        self.uow.users().update(id, changes).await?;
        tracing::info!(user_id = id, "Password reset");
        Ok(())
    }

    async fn statistics(&self) -> AppResult<UserStatistics> {
        let users = self.uow.users();
        let (total, active, inactive, by_document_type) = futures::try_join!(
            users.count(None),
            users.count(Some(true)),
            users.count(Some(false)),
            users.count_by_document_type(),
        )?;

        Ok(UserStatistics {
            total,
            active,
            inactive,
            by_document_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentType;
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::MockUserRepository;
    use mockall::predicate::{always, eq};

    fn test_user(id: i64, active: bool) -> User {
        let now = Utc::now();
        User {
            id,
            document_type: DocumentType::Cc,
            document_number: format!("10324567{:02}", id),
            first_names: "María".to_string(),
            last_names: "Rojas".to_string(),
            email: format!("user{}@example.com", id),
            phone: None,
            password_hash: "hash".to_string(),
            active,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_request() -> CreateUser {
        CreateUser {
            document_type: DocumentType::Cc,
            document_number: "1032456789".to_string(),
            first_names: "María".to_string(),
            last_names: "Rojas".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            password: "SecurePass123".to_string(),
        }
    }

    fn service(repo: MockUserRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(TestUnitOfWork::new().with_users(repo).into_arc())
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_document().returning(|_| Ok(false));
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|u| u.password_hash.starts_with("$argon2") && u.email == "maria@example.com")
            .times(1)
            .returning(|_| Ok(test_user(1, true)));

        let result = service(repo).create_user(create_request()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_document_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_document()
            .with(eq("1032456789"))
            .returning(|_| Ok(true));
        repo.expect_create().never();

        let result = service(repo).create_user(create_request()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_document().returning(|_| Ok(false));
        repo.expect_exists_by_email()
            .with(eq("maria@example.com"))
            .returning(|_| Ok(true));
        repo.expect_create().never();

        let result = service(repo).create_user(create_request()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo).get_user(99).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_deleted_user_leaves_active_list_but_stays_readable() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(|id, changes| *id == 3 && changes.active == Some(false))
            .times(1)
            .returning(|id, _| Ok(test_user(id, false)));
        repo.expect_list_by_active()
            .with(eq(true))
            .returning(|_| Ok(vec![test_user(1, true)]));
        repo.expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(test_user(id, false))));

        let users = service(repo);
        users.delete_user(3).await.unwrap();

        let active = users.list_active_users().await.unwrap();
        assert!(active.iter().all(|u| u.id != 3));

        let fetched = users.get_user(3).await.unwrap();
        assert!(!fetched.active);
    }

    #[tokio::test]
    async fn test_patch_to_taken_email_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, true))));
        repo.expect_exists_by_email()
            .with(eq("taken@example.com"))
            .returning(|_| Ok(true));
        repo.expect_update().never();

        let patch = PatchUser {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };
        let result = service(repo).patch_user(1, patch).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_patch_keeping_own_email_skips_uniqueness_check() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id, true))));
        repo.expect_exists_by_email().never();
        repo.expect_update()
            .with(eq(1), always())
            .returning(|id, _| Ok(test_user(id, true)));

        let patch = PatchUser {
            email: Some("user1@example.com".to_string()),
            ..Default::default()
        };
        assert!(service(repo).patch_user(1, patch).await.is_ok());
    }

    #[tokio::test]
    async fn test_last_administrator_cannot_be_deleted() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = test_user(id, true);
            user.roles = vec![ROLE_ADMIN.to_string()];
            Ok(Some(user))
        });
        repo.expect_list_by_role()
            .with(eq(ROLE_ADMIN))
            .returning(|_| Ok(vec![test_user(1, true)]));

        assert!(!service(repo).can_delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_be_deleted() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        assert!(!service(repo).can_delete(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_change_password_requires_current_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = test_user(id, true);
            user.password_hash = Password::new("OldPass123").unwrap().into_string();
            Ok(Some(user))
        });
        repo.expect_update().never();

        let request = ChangePassword {
            current_password: "NotMyPass1".to_string(),
            new_password: "NewPass123".to_string(),
        };
        let result = service(repo).change_password(1, request).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_statistics_combines_counts() {
        let mut repo = MockUserRepository::new();
        repo.expect_count().with(eq(None)).returning(|_| Ok(5));
        repo.expect_count().with(eq(Some(true))).returning(|_| Ok(4));
        repo.expect_count().with(eq(Some(false))).returning(|_| Ok(1));
        repo.expect_count_by_document_type()
            .returning(|| Ok([("CC".to_string(), 5)].into_iter().collect()));

        let stats = service(repo).statistics().await.unwrap();

        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 4);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.by_document_type.get("CC"), Some(&5));
    }
}
