//! Role assignment repository implementation.
//!
//! Rows are never duplicated for an active (user, role) pair: assigning an
//! inactive pair reactivates its most recent row. Hard delete is allowed.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::entities::assignment;
use crate::domain::RoleAssignment;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role assignment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<RoleAssignment>>;

    /// The active row for the pair, or else its most recent row
    async fn find_by_pair(&self, user_id: i64, role_id: i64)
        -> AppResult<Option<RoleAssignment>>;

    async fn find_active_by_pair(
        &self,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<Option<RoleAssignment>>;

    /// Activate the pair, reusing an inactive row when one exists
    async fn assign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment>;

    /// Flip the active flag of one row
    async fn set_active(&self, id: i64, active: bool) -> AppResult<RoleAssignment>;

    /// Hard delete
    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn list(&self) -> AppResult<Vec<RoleAssignment>>;

    async fn list_by_active(&self, active: bool) -> AppResult<Vec<RoleAssignment>>;

    /// Newest first; every row when `active_only` is false
    async fn list_by_user(&self, user_id: i64, active_only: bool)
        -> AppResult<Vec<RoleAssignment>>;

    /// Newest first; every row when `active_only` is false
    async fn list_by_role(&self, role_id: i64, active_only: bool)
        -> AppResult<Vec<RoleAssignment>>;

    async fn list_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn list_updated_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>>;

    async fn count(&self, active: Option<bool>) -> AppResult<u64>;

    async fn count_by_user(&self, user_id: i64, active: Option<bool>) -> AppResult<u64>;

    async fn count_by_role(&self, role_id: i64, active: Option<bool>) -> AppResult<u64>;

    /// Active assignment count per user id
    async fn active_counts_by_user(&self) -> AppResult<BTreeMap<i64, u64>>;
}

/// Concrete implementation of AssignmentRepository
pub struct AssignmentStore {
    db: DatabaseConnection,
}

impl AssignmentStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn count_where(
        &self,
        column: assignment::Column,
        value: i64,
        active: Option<bool>,
    ) -> AppResult<u64> {
        let mut query = assignment::Entity::find().filter(column.eq(value));
        if let Some(flag) = active {
            query = query.filter(assignment::Column::Active.eq(flag));
        }
        Ok(query.count(&self.db).await?)
    }
}

#[async_trait]
impl AssignmentRepository for AssignmentStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<RoleAssignment>> {
        let model = assignment::Entity::find_by_id(id).one(&self.db).await?;
        assignment_queries::labelled_one(&self.db, model).await
    }

    async fn find_by_pair(
        &self,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<Option<RoleAssignment>> {
        let model = assignment_queries::find_pair(&self.db, user_id, role_id).await?;
        assignment_queries::labelled_one(&self.db, model).await
    }

    async fn find_active_by_pair(
        &self,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<Option<RoleAssignment>> {
        let model = assignment_queries::find_active_pair(&self.db, user_id, role_id).await?;
        assignment_queries::labelled_one(&self.db, model).await
    }

    async fn assign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        let model = assignment_queries::assign(&self.db, user_id, role_id).await?;
        assignment_queries::labelled_required(&self.db, model).await
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<RoleAssignment> {
        let model = assignment_queries::set_active(&self.db, id, active).await?;
        assignment_queries::labelled_required(&self.db, model).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = assignment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Role assignment"));
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<RoleAssignment>> {
        let models = assignment::Entity::find()
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?;
        assignment_queries::labelled(&self.db, models).await
    }

    async fn list_by_active(&self, active: bool) -> AppResult<Vec<RoleAssignment>> {
        let models = assignment::Entity::find()
            .filter(assignment::Column::Active.eq(active))
            .order_by_desc(assignment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        assignment_queries::labelled(&self.db, models).await
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        active_only: bool,
    ) -> AppResult<Vec<RoleAssignment>> {
        let mut query = assignment::Entity::find().filter(assignment::Column::UserId.eq(user_id));
        if active_only {
            query = query.filter(assignment::Column::Active.eq(true));
        }

        let models = query
            .order_by_desc(assignment::Column::CreatedAt)
            .order_by_desc(assignment::Column::Id)
            .all(&self.db)
            .await?;
        assignment_queries::labelled(&self.db, models).await
    }

    async fn list_by_role(
        &self,
        role_id: i64,
        active_only: bool,
    ) -> AppResult<Vec<RoleAssignment>> {
        let mut query = assignment::Entity::find().filter(assignment::Column::RoleId.eq(role_id));
        if active_only {
            query = query.filter(assignment::Column::Active.eq(true));
        }

        let models = query
            .order_by_desc(assignment::Column::CreatedAt)
            .order_by_desc(assignment::Column::Id)
            .all(&self.db)
            .await?;
        assignment_queries::labelled(&self.db, models).await
    }

    async fn list_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>> {
        let models = assignment::Entity::find()
            .filter(assignment::Column::CreatedAt.between(from, to))
            .order_by_desc(assignment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        assignment_queries::labelled(&self.db, models).await
    }

    async fn list_updated_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<RoleAssignment>> {
        let models = assignment::Entity::find()
            .filter(assignment::Column::UpdatedAt.between(from, to))
            .order_by_desc(assignment::Column::UpdatedAt)
            .all(&self.db)
            .await?;
        assignment_queries::labelled(&self.db, models).await
    }

    async fn count(&self, active: Option<bool>) -> AppResult<u64> {
        let mut query = assignment::Entity::find();
        if let Some(flag) = active {
            query = query.filter(assignment::Column::Active.eq(flag));
        }
        Ok(query.count(&self.db).await?)
    }

    async fn count_by_user(&self, user_id: i64, active: Option<bool>) -> AppResult<u64> {
        self.count_where(assignment::Column::UserId, user_id, active)
            .await
    }

    async fn count_by_role(&self, role_id: i64, active: Option<bool>) -> AppResult<u64> {
        self.count_where(assignment::Column::RoleId, role_id, active)
            .await
    }

    async fn active_counts_by_user(&self) -> AppResult<BTreeMap<i64, u64>> {
        let rows = assignment::Entity::find()
            .select_only()
            .column(assignment::Column::UserId)
            .column_as(assignment::Column::Id.count(), "total")
            .filter(assignment::Column::Active.eq(true))
            .group_by(assignment::Column::UserId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, total)| (user_id, total.max(0) as u64))
            .collect())
    }
}

/// Queries shared by the pooled store and the transactional repository.
pub(crate) mod assignment_queries {
    use std::collections::HashMap;

    use chrono::Utc;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
        QueryOrder, Set,
    };

    use crate::domain::user::full_name;
    use crate::domain::RoleAssignment;
    use crate::errors::{AppError, AppResult, OptionExt};
    use crate::infra::repositories::entities::{assignment, role, user};

    pub async fn find_active_pair<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<Option<assignment::Model>> {
        let model = assignment::Entity::find()
            .filter(assignment::Column::UserId.eq(user_id))
            .filter(assignment::Column::RoleId.eq(role_id))
            .filter(assignment::Column::Active.eq(true))
            .one(db)
            .await?;
        Ok(model)
    }

    pub async fn find_pair<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<Option<assignment::Model>> {
        let model = assignment::Entity::find()
            .filter(assignment::Column::UserId.eq(user_id))
            .filter(assignment::Column::RoleId.eq(role_id))
            .order_by_desc(assignment::Column::Active)
            .order_by_desc(assignment::Column::UpdatedAt)
            .one(db)
            .await?;
        Ok(model)
    }

    pub async fn assign<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<assignment::Model> {
        let now = Utc::now();

        let model = match find_pair(db, user_id, role_id).await? {
            Some(existing) if existing.active => {
                return Err(AppError::conflict(format!(
                    "Active assignment of role {} to user {}",
                    role_id, user_id
                )));
            }
            Some(existing) => {
                let mut active: assignment::ActiveModel = existing.into();
                active.active = Set(true);
                active.updated_at = Set(now);
                active.update(db).await.map_err(|e| pair_write_error(e, user_id, role_id))?
            }
            None => {
                assignment::ActiveModel {
                    user_id: Set(user_id),
                    role_id: Set(role_id),
                    active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(|e| pair_write_error(e, user_id, role_id))?
            }
        };

        Ok(model)
    }

    pub async fn set_active<C: ConnectionTrait>(
        db: &C,
        id: i64,
        active: bool,
    ) -> AppResult<assignment::Model> {
        let existing = assignment::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_not_found("Role assignment")?;

        if active && !existing.active {
            if let Some(other) = find_active_pair(db, existing.user_id, existing.role_id).await? {
                return Err(AppError::conflict(format!(
                    "Active assignment {} for the same user and role",
                    other.id
                )));
            }
        }

        let (user_id, role_id) = (existing.user_id, existing.role_id);
        let mut model: assignment::ActiveModel = existing.into();
        model.active = Set(active);
        model.updated_at = Set(Utc::now());
        model
            .update(db)
            .await
            .map_err(|e| pair_write_error(e, user_id, role_id))
    }

    /// The partial unique index on active pairs catches concurrent assigns
    fn pair_write_error(err: DbErr, user_id: i64, role_id: i64) -> AppError {
        AppError::from_write(
            err,
            format!("Active assignment of role {} to user {}", role_id, user_id),
        )
    }

    /// Deactivate the active row of a pair
    pub async fn deactivate_pair<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<assignment::Model> {
        let existing = find_active_pair(db, user_id, role_id)
            .await?
            .ok_or_not_found("Active role assignment")?;
        set_active(db, existing.id, false).await
    }

    /// Attach user and role labels, loading each table once.
    pub async fn labelled<C: ConnectionTrait>(
        db: &C,
        models: Vec<assignment::Model>,
    ) -> AppResult<Vec<RoleAssignment>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i64> = models.iter().map(|m| m.user_id).collect();
        let role_ids: Vec<i64> = models.iter().map(|m| m.role_id).collect();

        let users: HashMap<i64, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let roles: HashMap<i64, String> = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let owner = users.get(&m.user_id);
                RoleAssignment {
                    id: m.id,
                    user_id: m.user_id,
                    role_id: m.role_id,
                    active: m.active,
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                    user_document_number: owner.map(|u| u.document_number.clone()),
                    user_full_name: owner.map(|u| full_name(&u.first_names, &u.last_names)),
                    role_name: roles.get(&m.role_id).cloned(),
                }
            })
            .collect())
    }

    pub async fn labelled_one<C: ConnectionTrait>(
        db: &C,
        model: Option<assignment::Model>,
    ) -> AppResult<Option<RoleAssignment>> {
        match model {
            Some(model) => Ok(labelled(db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn labelled_required<C: ConnectionTrait>(
        db: &C,
        model: assignment::Model,
    ) -> AppResult<RoleAssignment> {
        labelled_one(db, Some(model))
            .await?
            .ok_or_not_found("Role assignment")
    }
}
