//! Apartment repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::entities::apartment;
use crate::domain::{Apartment, ApartmentInput};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Apartment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Apartment>>;

    /// Ordered by tower, then number
    async fn list(&self) -> AppResult<Vec<Apartment>>;

    async fn create(&self, input: ApartmentInput) -> AppResult<Apartment>;

    async fn update(&self, id: i64, input: ApartmentInput) -> AppResult<Apartment>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ApartmentRepository
pub struct ApartmentStore {
    db: DatabaseConnection,
}

impl ApartmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApartmentRepository for ApartmentStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Apartment>> {
        let model = apartment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Apartment::from))
    }

    async fn list(&self) -> AppResult<Vec<Apartment>> {
        let models = apartment::Entity::find()
            .order_by_asc(apartment::Column::Tower)
            .order_by_asc(apartment::Column::Number)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Apartment::from).collect())
    }

    async fn create(&self, input: ApartmentInput) -> AppResult<Apartment> {
        let model = apartment::ActiveModel {
            number: Set(input.number),
            tower: Set(input.tower),
            owner_id: Set(input.owner_id),
            status: Set(input.status.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(Apartment::from(model))
    }

    async fn update(&self, id: i64, input: ApartmentInput) -> AppResult<Apartment> {
        let existing = apartment::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Apartment")?;

        let mut active: apartment::ActiveModel = existing.into();
        active.number = Set(input.number);
        active.tower = Set(input.tower);
        active.owner_id = Set(input.owner_id);
        active.status = Set(input.status.into());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Apartment::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = apartment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Apartment"));
        }

        Ok(())
    }
}
