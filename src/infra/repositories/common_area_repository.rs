//! Common area repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::contains_ignore_case;
use super::entities::common_area;
use crate::domain::{AreaStatus, CommonArea, CommonAreaFilter, CreateCommonArea, UpdateCommonArea};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Common area repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommonAreaRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<CommonArea>>;

    /// Areas matching every set criterion, ordered by name
    async fn search(&self, filter: CommonAreaFilter) -> AppResult<Vec<CommonArea>>;

    async fn create(&self, input: CreateCommonArea) -> AppResult<CommonArea>;

    async fn update(&self, id: i64, input: UpdateCommonArea) -> AppResult<CommonArea>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn count_by_status(&self, status: AreaStatus) -> AppResult<u64>;
}

/// Concrete implementation of CommonAreaRepository
pub struct CommonAreaStore {
    db: DatabaseConnection,
}

impl CommonAreaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommonAreaRepository for CommonAreaStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<CommonArea>> {
        let model = common_area::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(CommonArea::from))
    }

    async fn search(&self, filter: CommonAreaFilter) -> AppResult<Vec<CommonArea>> {
        let mut query = common_area::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(common_area::Column::Status.eq(status.as_str()));
        }
        if let Some(capacity) = filter.capacity_above {
            query = query.filter(common_area::Column::MaxCapacity.gt(capacity));
        }
        if let Some(text) = filter.text.as_deref() {
            query = query.filter(
                Condition::any()
                    .add(contains_ignore_case(common_area::Column::Name, text))
                    .add(contains_ignore_case(common_area::Column::Description, text)),
            );
        }

        let models = query
            .order_by_asc(common_area::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(CommonArea::from).collect())
    }

    async fn create(&self, input: CreateCommonArea) -> AppResult<CommonArea> {
        let model = common_area::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            location: Set(input.location),
            max_capacity: Set(input.max_capacity),
            opening_hours: Set(input.opening_hours),
            status: Set(input.status.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(CommonArea::from(model))
    }

    async fn update(&self, id: i64, input: UpdateCommonArea) -> AppResult<CommonArea> {
        let existing = common_area::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Common area")?;

        let mut active: common_area::ActiveModel = existing.into();
        active.max_capacity = Set(input.max_capacity);
        active.description = Set(input.description);
        active.opening_hours = Set(input.opening_hours);
        active.status = Set(input.status.into());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(CommonArea::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = common_area::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Common area"));
        }

        Ok(())
    }

    async fn count_by_status(&self, status: AreaStatus) -> AppResult<u64> {
        let count = common_area::Entity::find()
            .filter(common_area::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
