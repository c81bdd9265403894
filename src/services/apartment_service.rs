//! Apartment service - Units and their owners.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Apartment, ApartmentInput};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Apartment service trait for dependency injection.
#[async_trait]
pub trait ApartmentService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Apartment>>;

    async fn get(&self, id: i64) -> AppResult<Apartment>;

    /// The owner must be an existing user
    async fn create(&self, input: ApartmentInput) -> AppResult<Apartment>;

    async fn update(&self, id: i64, input: ApartmentInput) -> AppResult<Apartment>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ApartmentService using Unit of Work.
pub struct ApartmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ApartmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_owner(&self, owner_id: i64) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_not_found("Owner")
            .map(|_| ())
    }
}

#[async_trait]
impl<U: UnitOfWork> ApartmentService for ApartmentManager<U> {
    async fn list(&self) -> AppResult<Vec<Apartment>> {
        self.uow.apartments().list().await
    }

    async fn get(&self, id: i64) -> AppResult<Apartment> {
        self.uow
            .apartments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Apartment")
    }

    async fn create(&self, input: ApartmentInput) -> AppResult<Apartment> {
        self.ensure_owner(input.owner_id).await?;

        let apartment = self.uow.apartments().create(input).await?;
        tracing::info!(
            apartment_id = apartment.id,
            tower = %apartment.tower,
            number = %apartment.number,
            "Apartment created"
        );
        Ok(apartment)
    }

    async fn update(&self, id: i64, input: ApartmentInput) -> AppResult<Apartment> {
        self.get(id).await?;
        self.ensure_owner(input.owner_id).await?;
        self.uow.apartments().update(id, input).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.apartments().delete(id).await?;
        tracing::info!(apartment_id = id, "Apartment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OccupancyStatus;
    use crate::errors::AppError;
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockApartmentRepository, MockUserRepository};

    fn input(owner_id: i64) -> ApartmentInput {
        ApartmentInput {
            number: "502".to_string(),
            tower: "B".to_string(),
            owner_id,
            status: OccupancyStatus::Occupied,
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_owner() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut apartments = MockApartmentRepository::new();
        apartments.expect_create().never();

        let uow = TestUnitOfWork::new()
            .with_users(users)
            .with_apartments(apartments)
            .into_arc();
        let result = ApartmentManager::new(uow).create(input(42)).await;

        assert!(matches!(result, Err(AppError::NotFound(what)) if what == "Owner"));
    }

    #[tokio::test]
    async fn test_get_missing_apartment() {
        let mut apartments = MockApartmentRepository::new();
        apartments.expect_find_by_id().returning(|_| Ok(None));

        let uow = TestUnitOfWork::new().with_apartments(apartments).into_arc();
        let result = ApartmentManager::new(uow).get(7).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
