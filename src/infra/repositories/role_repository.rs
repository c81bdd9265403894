//! Role repository implementation.
//!
//! Roles carry their permission list as JSON text and report how many
//! active assignments point at them.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::contains_ignore_case;
use super::entities::{assignment, role};
use crate::domain::{NewRole, Role, RoleChanges};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;

    /// Exact name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn find_by_name_ignore_case(&self, name: &str) -> AppResult<Option<Role>>;

    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    async fn exists_active_by_name(&self, name: &str) -> AppResult<bool>;

    async fn create(&self, role: NewRole) -> AppResult<Role>;

    /// Apply the present fields; fails with NotFound for unknown ids
    async fn update(&self, id: i64, changes: RoleChanges) -> AppResult<Role>;

    /// All roles ordered by id
    async fn list(&self) -> AppResult<Vec<Role>>;

    /// Active roles by name, or inactive roles by most recently changed
    async fn list_by_active(&self, active: bool) -> AppResult<Vec<Role>>;

    /// Active roles whose description contains the text, ignoring case
    async fn search_by_description(&self, text: &str) -> AppResult<Vec<Role>>;

    /// Active roles whose stored permission text contains the given string
    async fn list_by_permission(&self, permission: &str) -> AppResult<Vec<Role>>;

    /// Roles the user holds through active assignments
    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Role>>;

    async fn list_without_users(&self) -> AppResult<Vec<Role>>;

    /// Roles with at least `minimum` active users, most users first
    async fn list_with_min_users(&self, minimum: u64) -> AppResult<Vec<Role>>;

    async fn list_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Role>>;

    async fn count(&self, active: Option<bool>) -> AppResult<u64>;

    /// Active user count per role name
    async fn user_counts_by_name(&self) -> AppResult<BTreeMap<String, u64>>;
}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_counts(&self, models: Vec<role::Model>) -> AppResult<Vec<Role>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let counts = active_user_counts(&self.db, &ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let users = counts.get(&m.id).copied().unwrap_or(0);
                m.into_domain(users)
            })
            .collect())
    }

    async fn one_with_count(&self, model: Option<role::Model>) -> AppResult<Option<Role>> {
        match model {
            Some(model) => Ok(self.with_counts(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// Active assignment count per role id; an empty id list counts every role.
/// Roles without users are absent.
pub(crate) async fn active_user_counts<C: ConnectionTrait>(
    db: &C,
    role_ids: &[i64],
) -> AppResult<HashMap<i64, u64>> {
    let mut query = assignment::Entity::find()
        .select_only()
        .column(assignment::Column::RoleId)
        .column_as(assignment::Column::Id.count(), "total")
        .filter(assignment::Column::Active.eq(true))
        .group_by(assignment::Column::RoleId);

    if !role_ids.is_empty() {
        query = query.filter(assignment::Column::RoleId.is_in(role_ids.iter().copied()));
    }

    let rows = query.into_tuple::<(i64, i64)>().all(db).await?;
    Ok(rows
        .into_iter()
        .map(|(role_id, total)| (role_id, total.max(0) as u64))
        .collect())
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        let model = role::Entity::find_by_id(id).one(&self.db).await?;
        self.one_with_count(model).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let model = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        self.one_with_count(model).await
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> AppResult<Option<Role>> {
        let model = role::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(role::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(&self.db)
            .await?;
        self.one_with_count(model).await
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let count = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_active_by_name(&self, name: &str) -> AppResult<bool> {
        let count = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .filter(role::Column::Active.eq(true))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, new_role: NewRole) -> AppResult<Role> {
        let now = Utc::now();
        let active_model = role::ActiveModel {
            name: Set(new_role.name),
            description: Set(new_role.description),
            active: Set(true),
            permissions: Set(Some(new_role.permissions.to_stored())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Role with this name"))?;
        Ok(model.into_domain(0))
    }

    async fn update(&self, id: i64, changes: RoleChanges) -> AppResult<Role> {
        let existing = role::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Role")?;

        let mut active: role::ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(permissions) = changes.permissions {
            active.permissions = Set(Some(permissions.to_stored()));
        }
        if let Some(flag) = changes.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Role with this name"))?;
        self.one_with_count(Some(model))
            .await?
            .ok_or_not_found("Role")
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?;
        self.with_counts(models).await
    }

    async fn list_by_active(&self, active: bool) -> AppResult<Vec<Role>> {
        let query = role::Entity::find().filter(role::Column::Active.eq(active));
        let query = if active {
            query.order_by_asc(role::Column::Name)
        } else {
            query.order_by_desc(role::Column::UpdatedAt)
        };

        let models = query.all(&self.db).await?;
        self.with_counts(models).await
    }

    async fn search_by_description(&self, text: &str) -> AppResult<Vec<Role>> {
        let models = role::Entity::find()
            .filter(role::Column::Active.eq(true))
            .filter(contains_ignore_case(role::Column::Description, text))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;
        self.with_counts(models).await
    }

    async fn list_by_permission(&self, permission: &str) -> AppResult<Vec<Role>> {
        // Substring match over the JSON text: "READ_USER" also hits "READ_USERS"
        let models = role::Entity::find()
            .filter(role::Column::Active.eq(true))
            .filter(role::Column::Permissions.contains(permission))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;
        self.with_counts(models).await
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Role>> {
        let role_ids = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::RoleId)
            .filter(assignment::Column::UserId.eq(user_id))
            .filter(assignment::Column::Active.eq(true))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;

        let models = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;
        self.with_counts(models).await
    }

    async fn list_without_users(&self) -> AppResult<Vec<Role>> {
        let counts = active_user_counts(&self.db, &[]).await?;
        let models = role::Entity::find()
            .filter(role::Column::Id.is_not_in(counts.keys().copied()))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_domain(0)).collect())
    }

    async fn list_with_min_users(&self, minimum: u64) -> AppResult<Vec<Role>> {
        let models = role::Entity::find().all(&self.db).await?;
        let mut roles: Vec<Role> = self
            .with_counts(models)
            .await?
            .into_iter()
            .filter(|r| r.number_of_users >= minimum)
            .collect();
        roles.sort_by(|a, b| {
            b.number_of_users
                .cmp(&a.number_of_users)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(roles)
    }

    async fn list_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Role>> {
        let models = role::Entity::find()
            .filter(role::Column::CreatedAt.between(from, to))
            .order_by_desc(role::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.with_counts(models).await
    }

    async fn count(&self, active: Option<bool>) -> AppResult<u64> {
        let mut query = role::Entity::find();
        if let Some(flag) = active {
            query = query.filter(role::Column::Active.eq(flag));
        }
        Ok(query.count(&self.db).await?)
    }

    async fn user_counts_by_name(&self) -> AppResult<BTreeMap<String, u64>> {
        let roles = role::Entity::find().all(&self.db).await?;
        let counts = active_user_counts(&self.db, &[]).await?;

        Ok(roles
            .into_iter()
            .map(|r| {
                let users = counts.get(&r.id).copied().unwrap_or(0);
                (r.name, users)
            })
            .collect())
    }
}
