//! Parking spot repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::parking_spot;
use crate::domain::{ParkingInput, ParkingSpot};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Parking spot repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ParkingRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingSpot>>;

    /// Ordered by number
    async fn list(&self) -> AppResult<Vec<ParkingSpot>>;

    /// Whether another spot already uses the number
    async fn number_taken(&self, number: &str, except_id: Option<i64>) -> AppResult<bool>;

    async fn create(&self, input: ParkingInput) -> AppResult<ParkingSpot>;

    async fn update(&self, id: i64, input: ParkingInput) -> AppResult<ParkingSpot>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ParkingRepository
pub struct ParkingStore {
    db: DatabaseConnection,
}

impl ParkingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParkingRepository for ParkingStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingSpot>> {
        let model = parking_spot::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(ParkingSpot::from))
    }

    async fn list(&self) -> AppResult<Vec<ParkingSpot>> {
        let models = parking_spot::Entity::find()
            .order_by_asc(parking_spot::Column::Number)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ParkingSpot::from).collect())
    }

    async fn number_taken(&self, number: &str, except_id: Option<i64>) -> AppResult<bool> {
        let mut query =
            parking_spot::Entity::find().filter(parking_spot::Column::Number.eq(number));
        if let Some(id) = except_id {
            query = query.filter(parking_spot::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    async fn create(&self, input: ParkingInput) -> AppResult<ParkingSpot> {
        let model = parking_spot::ActiveModel {
            spot_type: Set(input.spot_type.into()),
            number: Set(input.number),
            user_id: Set(input.user_id),
            status: Set(input.status.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Parking spot with this number"))?;

        Ok(ParkingSpot::from(model))
    }

    async fn update(&self, id: i64, input: ParkingInput) -> AppResult<ParkingSpot> {
        let existing = parking_spot::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Parking spot")?;

        let mut active: parking_spot::ActiveModel = existing.into();
        active.spot_type = Set(input.spot_type.into());
        active.number = Set(input.number);
        active.user_id = Set(input.user_id);
        active.status = Set(input.status.into());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Parking spot with this number"))?;
        Ok(ParkingSpot::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = parking_spot::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Parking spot"));
        }

        Ok(())
    }
}
