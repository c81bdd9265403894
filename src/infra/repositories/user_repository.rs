//! User repository implementation.
//!
//! Users are never deleted; the `active` flag is the soft delete marker.
//! Every returned [`User`] carries the names of its active roles.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::{assignment, role, user};
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, active or not
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_document(&self, document_number: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn exists_by_document(&self, document_number: &str) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply the present fields; fails with NotFound for unknown ids
    async fn update(&self, id: i64, changes: UserChanges) -> AppResult<User>;

    /// All users ordered by id
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Active users by name, or inactive users by most recently changed
    async fn list_by_active(&self, active: bool) -> AppResult<Vec<User>>;

    /// Case-insensitive match on "first_names last_names"
    async fn search_by_name(&self, term: &str) -> AppResult<Vec<User>>;

    /// Active users holding an active assignment of the named role
    async fn list_by_role(&self, role_name: &str) -> AppResult<Vec<User>>;

    async fn list_without_roles(&self) -> AppResult<Vec<User>>;

    async fn list_with_multiple_roles(&self) -> AppResult<Vec<User>>;

    /// Newest first
    async fn list_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<User>>;

    /// Count users, optionally restricted by the active flag
    async fn count(&self, active: Option<bool>) -> AppResult<u64>;

    async fn count_by_document_type(&self) -> AppResult<BTreeMap<String, u64>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_roles(&self, models: Vec<user::Model>) -> AppResult<Vec<User>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut roles = active_role_names(&self.db, &ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let names = roles.remove(&m.id).unwrap_or_default();
                m.into_domain(names)
            })
            .collect())
    }

    async fn one_with_roles(&self, model: Option<user::Model>) -> AppResult<Option<User>> {
        match model {
            Some(model) => Ok(self.with_roles(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Ids of users holding at least one active assignment
    async fn ids_with_active_assignments(&self) -> AppResult<Vec<i64>> {
        let ids = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::UserId)
            .filter(assignment::Column::Active.eq(true))
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

/// Active role names per user id, sorted by name.
pub(crate) async fn active_role_names<C: ConnectionTrait>(
    db: &C,
    user_ids: &[i64],
) -> AppResult<HashMap<i64, Vec<String>>> {
    let mut names: HashMap<i64, Vec<String>> = HashMap::new();
    if user_ids.is_empty() {
        return Ok(names);
    }

    let rows = assignment::Entity::find()
        .filter(assignment::Column::UserId.is_in(user_ids.iter().copied()))
        .filter(assignment::Column::Active.eq(true))
        .find_also_related(role::Entity)
        .all(db)
        .await?;

    for (link, role) in rows {
        if let Some(role) = role {
            names.entry(link.user_id).or_default().push(role.name);
        }
    }
    for list in names.values_mut() {
        list.sort();
    }
    Ok(names)
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        self.one_with_roles(model).await
    }

    async fn find_by_document(&self, document_number: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::DocumentNumber.eq(document_number))
            .one(&self.db)
            .await?;
        self.one_with_roles(model).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        self.one_with_roles(model).await
    }

    async fn exists_by_document(&self, document_number: &str) -> AppResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::DocumentNumber.eq(document_number))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            document_type: Set(new_user.document_type.into()),
            document_number: Set(new_user.document_number),
            first_names: Set(new_user.first_names),
            last_names: Set(new_user.last_names),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            password_hash: Set(new_user.password_hash),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "User with this document or email"))?;
        Ok(model.into_domain(Vec::new()))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> AppResult<User> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")?;

        let mut active: user::ActiveModel = existing.into();

        if let Some(document_type) = changes.document_type {
            active.document_type = Set(document_type.into());
        }
        if let Some(document_number) = changes.document_number {
            active.document_number = Set(document_number);
        }
        if let Some(first_names) = changes.first_names {
            active.first_names = Set(first_names);
        }
        if let Some(last_names) = changes.last_names {
            active.last_names = Set(last_names);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "User with this document or email"))?;
        self.one_with_roles(Some(model))
            .await?
            .ok_or_not_found("User")
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        self.with_roles(models).await
    }

    async fn list_by_active(&self, active: bool) -> AppResult<Vec<User>> {
        let query = user::Entity::find().filter(user::Column::Active.eq(active));
        let query = if active {
            query
                .order_by_asc(user::Column::FirstNames)
                .order_by_asc(user::Column::LastNames)
        } else {
            query.order_by_desc(user::Column::UpdatedAt)
        };

        let models = query.all(&self.db).await?;
        self.with_roles(models).await
    }

    async fn search_by_name(&self, term: &str) -> AppResult<Vec<User>> {
        let pattern = format!("%{}%", term.trim().to_lowercase());
        let models = user::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::cust(
                    "\"first_names\" || ' ' || \"last_names\"",
                )))
                .like(pattern),
            )
            .order_by_asc(user::Column::FirstNames)
            .order_by_asc(user::Column::LastNames)
            .all(&self.db)
            .await?;
        self.with_roles(models).await
    }

    async fn list_by_role(&self, role_name: &str) -> AppResult<Vec<User>> {
        let Some(found) = role::Entity::find()
            .filter(role::Column::Name.eq(role_name))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let user_ids = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::UserId)
            .filter(assignment::Column::RoleId.eq(found.id))
            .filter(assignment::Column::Active.eq(true))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .filter(user::Column::Active.eq(true))
            .order_by_asc(user::Column::FirstNames)
            .all(&self.db)
            .await?;
        self.with_roles(models).await
    }

    async fn list_without_roles(&self) -> AppResult<Vec<User>> {
        let assigned = self.ids_with_active_assignments().await?;
        let models = user::Entity::find()
            .filter(user::Column::Id.is_not_in(assigned))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_domain(Vec::new())).collect())
    }

    async fn list_with_multiple_roles(&self) -> AppResult<Vec<User>> {
        let user_ids = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::UserId)
            .filter(assignment::Column::Active.eq(true))
            .group_by(assignment::Column::UserId)
            .having(Expr::expr(Func::count(Expr::col(assignment::Column::Id))).gt(1))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        self.with_roles(models).await
    }

    async fn list_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::CreatedAt.between(from, to))
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.with_roles(models).await
    }

    async fn count(&self, active: Option<bool>) -> AppResult<u64> {
        let mut query = user::Entity::find();
        if let Some(flag) = active {
            query = query.filter(user::Column::Active.eq(flag));
        }
        Ok(query.count(&self.db).await?)
    }

    async fn count_by_document_type(&self) -> AppResult<BTreeMap<String, u64>> {
        let rows = user::Entity::find()
            .select_only()
            .column(user::Column::DocumentType)
            .column_as(user::Column::Id.count(), "total")
            .group_by(user::Column::DocumentType)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(kind, total)| (kind, total.max(0) as u64))
            .collect())
    }
}
