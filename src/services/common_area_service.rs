//! Common area service - Shared facilities catalog.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AreaStatus, CommonArea, CommonAreaFilter, CreateCommonArea, UpdateCommonArea};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Common area service trait for dependency injection.
#[async_trait]
pub trait CommonAreaService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<CommonArea>>;

    async fn get(&self, id: i64) -> AppResult<CommonArea>;

    async fn create(&self, input: CreateCommonArea) -> AppResult<CommonArea>;

    async fn update(&self, id: i64, input: UpdateCommonArea) -> AppResult<CommonArea>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Active areas holding more than `capacity` people, by name
    async fn active_with_capacity_above(&self, capacity: i32) -> AppResult<Vec<CommonArea>>;

    async fn by_status_with_capacity_above(
        &self,
        status: AreaStatus,
        capacity: i32,
    ) -> AppResult<Vec<CommonArea>>;

    /// Case-insensitive match on name or description
    async fn search(&self, text: &str) -> AppResult<Vec<CommonArea>>;

    async fn count_by_status(&self, status: AreaStatus) -> AppResult<u64>;
}

/// Concrete implementation of CommonAreaService using Unit of Work.
pub struct CommonAreaManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CommonAreaManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CommonAreaService for CommonAreaManager<U> {
    async fn list(&self) -> AppResult<Vec<CommonArea>> {
        self.uow
            .common_areas()
            .search(CommonAreaFilter::default())
            .await
    }

    async fn get(&self, id: i64) -> AppResult<CommonArea> {
        self.uow
            .common_areas()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Common area")
    }

    async fn create(&self, input: CreateCommonArea) -> AppResult<CommonArea> {
        let area = self.uow.common_areas().create(input).await?;
        tracing::info!(area_id = area.id, name = %area.name, "Common area created");
        Ok(area)
    }

    async fn update(&self, id: i64, input: UpdateCommonArea) -> AppResult<CommonArea> {
        self.uow.common_areas().update(id, input).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.common_areas().delete(id).await?;
        tracing::info!(area_id = id, "Common area deleted");
        Ok(())
    }

    async fn active_with_capacity_above(&self, capacity: i32) -> AppResult<Vec<CommonArea>> {
        self.by_status_with_capacity_above(AreaStatus::Active, capacity)
            .await
    }

    async fn by_status_with_capacity_above(
        &self,
        status: AreaStatus,
        capacity: i32,
    ) -> AppResult<Vec<CommonArea>> {
        self.uow
            .common_areas()
            .search(CommonAreaFilter {
                status: Some(status),
                capacity_above: Some(capacity),
                ..Default::default()
            })
            .await
    }

    async fn search(&self, text: &str) -> AppResult<Vec<CommonArea>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::bad_request("search text must not be empty"));
        }

        self.uow
            .common_areas()
            .search(CommonAreaFilter {
                text: Some(text.to_string()),
                ..Default::default()
            })
            .await
    }

    async fn count_by_status(&self, status: AreaStatus) -> AppResult<u64> {
        self.uow.common_areas().count_by_status(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::MockCommonAreaRepository;

    fn pool() -> CommonArea {
        CommonArea {
            id: 1,
            name: "Piscina".to_string(),
            description: "Piscina climatizada para adultos".to_string(),
            location: "Torre C, terraza".to_string(),
            max_capacity: 30,
            opening_hours: "Martes a domingo 9:00 - 18:00".to_string(),
            status: AreaStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_active_with_capacity_builds_filter() {
        let mut areas = MockCommonAreaRepository::new();
        areas.expect_search()
            .withf(|f| {
                f.status == Some(AreaStatus::Active) && f.capacity_above == Some(20) && f.text.is_none()
            })
            .times(1)
            .returning(|_| Ok(vec![pool()]));

        let uow = TestUnitOfWork::new().with_common_areas(areas).into_arc();
        let found = CommonAreaManager::new(uow)
            .active_with_capacity_above(20)
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected() {
        let mut areas = MockCommonAreaRepository::new();
        areas.expect_search().never();

        let uow = TestUnitOfWork::new().with_common_areas(areas).into_arc();
        let result = CommonAreaManager::new(uow).search("   ").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
