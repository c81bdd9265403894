//! Parking service - Spot inventory and assignment to users.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ParkingInput, ParkingSpot};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Parking service trait for dependency injection.
#[async_trait]
pub trait ParkingService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<ParkingSpot>>;

    async fn get(&self, id: i64) -> AppResult<ParkingSpot>;

    /// Spot numbers are unique
    async fn create(&self, input: ParkingInput) -> AppResult<ParkingSpot>;

    async fn update(&self, id: i64, input: ParkingInput) -> AppResult<ParkingSpot>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ParkingService using Unit of Work.
pub struct ParkingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ParkingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn validate(&self, input: &ParkingInput, except_id: Option<i64>) -> AppResult<()> {
        if self
            .uow
            .parking_spots()
            .number_taken(&input.number, except_id)
            .await?
        {
            return Err(AppError::conflict(format!("Parking spot {}", input.number)));
        }

        if let Some(user_id) = input.user_id {
            self.uow
                .users()
                .find_by_id(user_id)
                .await?
                .ok_or_not_found("User")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> ParkingService for ParkingManager<U> {
    async fn list(&self) -> AppResult<Vec<ParkingSpot>> {
        self.uow.parking_spots().list().await
    }

    async fn get(&self, id: i64) -> AppResult<ParkingSpot> {
        self.uow
            .parking_spots()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Parking spot")
    }

    async fn create(&self, input: ParkingInput) -> AppResult<ParkingSpot> {
        self.validate(&input, None).await?;

        let spot = self.uow.parking_spots().create(input).await?;
        tracing::info!(spot_id = spot.id, number = %spot.number, "Parking spot created");
        Ok(spot)
    }

    async fn update(&self, id: i64, input: ParkingInput) -> AppResult<ParkingSpot> {
        self.get(id).await?;
        self.validate(&input, Some(id)).await?;
        self.uow.parking_spots().update(id, input).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.parking_spots().delete(id).await?;
        tracing::info!(spot_id = id, "Parking spot deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OccupancyStatus, SpotType};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::MockParkingRepository;
    use mockall::predicate::eq;

    fn input(number: &str) -> ParkingInput {
        ParkingInput {
            spot_type: SpotType::Visitor,
            number: number.to_string(),
            user_id: None,
            status: OccupancyStatus::Free,
        }
    }

    fn spot(id: i64, number: &str) -> ParkingSpot {
        ParkingSpot {
            id,
            spot_type: SpotType::Visitor,
            number: number.to_string(),
            user_id: None,
            status: OccupancyStatus::Free,
        }
    }

    #[tokio::test]
    async fn test_duplicate_number_is_conflict() {
        let mut parking = MockParkingRepository::new();
        parking.expect_number_taken()
            .with(eq("V-01"), eq(None::<i64>))
            .returning(|_, _| Ok(true));
        parking.expect_create().never();

        let uow = TestUnitOfWork::new().with_parking_spots(parking).into_arc();
        let result = ParkingManager::new(uow).create(input("V-01")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_own_number() {
        let mut parking = MockParkingRepository::new();
        parking.expect_find_by_id()
            .returning(|id| Ok(Some(spot(id, "V-01"))));
        parking.expect_number_taken()
            .with(eq("V-01"), eq(Some(3)))
            .returning(|_, _| Ok(false));
        parking.expect_update()
            .times(1)
            .returning(|id, input| Ok(spot(id, &input.number)));

        let uow = TestUnitOfWork::new().with_parking_spots(parking).into_arc();
        let updated = ParkingManager::new(uow).update(3, input("V-01")).await.unwrap();

        assert_eq!(updated.id, 3);
    }
}
