//! Correspondence service - Front desk mail and package log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Correspondence, CorrespondenceFilter, CorrespondenceInput, CorrespondenceKind,
    CorrespondenceStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Correspondence service trait for dependency injection.
#[async_trait]
pub trait CorrespondenceService: Send + Sync {
    async fn create(&self, input: CorrespondenceInput) -> AppResult<Correspondence>;

    async fn list(&self) -> AppResult<Vec<Correspondence>>;

    async fn get(&self, id: i64) -> AppResult<Correspondence>;

    async fn update(&self, id: i64, input: CorrespondenceInput) -> AppResult<Correspondence>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn by_recipient(&self, recipient_id: i64) -> AppResult<Vec<Correspondence>>;

    async fn by_status(&self, status: CorrespondenceStatus) -> AppResult<Vec<Correspondence>>;

    async fn by_kind(&self, kind: CorrespondenceKind) -> AppResult<Vec<Correspondence>>;

    async fn received_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Correspondence>>;

    async fn picked_up_by(&self, user_id: i64) -> AppResult<Vec<Correspondence>>;

    /// Pending items, oldest first
    async fn pending(&self) -> AppResult<Vec<Correspondence>>;

    async fn pending_for_recipient(&self, recipient_id: i64) -> AppResult<Vec<Correspondence>>;

    async fn recorded_by(&self, user_id: i64) -> AppResult<Vec<Correspondence>>;

    async fn by_kind_and_status(
        &self,
        kind: CorrespondenceKind,
        status: CorrespondenceStatus,
    ) -> AppResult<Vec<Correspondence>>;

    /// Pending items received before `cutoff`
    async fn stale_pending(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Correspondence>>;

    async fn mark_delivered(&self, id: i64, picked_up_by_id: i64) -> AppResult<Correspondence>;
}

/// Concrete implementation of CorrespondenceService using Unit of Work.
pub struct CorrespondenceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CorrespondenceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn search(&self, filter: CorrespondenceFilter) -> AppResult<Vec<Correspondence>> {
        self.uow.correspondence().search(filter).await
    }

    async fn ensure_user(&self, id: i64, label: &str) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(label)
            .map(|_| ())
    }

    async fn validate_references(&self, input: &CorrespondenceInput) -> AppResult<()> {
        self.ensure_user(input.recorded_by_id, "Recording user").await?;
        self.ensure_user(input.recipient_id, "Recipient").await?;
        if let Some(id) = input.picked_up_by_id {
            self.ensure_user(id, "Pickup user").await?;
        }
        if let Some(id) = input.apartment_id {
            self.uow
                .apartments()
                .find_by_id(id)
                .await?
                .ok_or_not_found("Apartment")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CorrespondenceService for CorrespondenceManager<U> {
    async fn create(&self, input: CorrespondenceInput) -> AppResult<Correspondence> {
        self.validate_references(&input).await?;

        let item = self.uow.correspondence().create(input).await?;
        tracing::info!(
            correspondence_id = item.id,
            recipient_id = item.recipient_id,
            kind = %item.kind,
            "Correspondence registered"
        );
        Ok(item)
    }

    async fn list(&self) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter::default()).await
    }

    async fn get(&self, id: i64) -> AppResult<Correspondence> {
        self.uow
            .correspondence()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Correspondence")
    }

    async fn update(&self, id: i64, input: CorrespondenceInput) -> AppResult<Correspondence> {
        self.get(id).await?;
        self.validate_references(&input).await?;
        self.uow.correspondence().update(id, input).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.correspondence().delete(id).await?;
        tracing::info!(correspondence_id = id, "Correspondence deleted");
        Ok(())
    }

    async fn by_recipient(&self, recipient_id: i64) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            recipient_id: Some(recipient_id),
            ..Default::default()
        })
        .await
    }

    async fn by_status(&self, status: CorrespondenceStatus) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            status: Some(status),
            ..Default::default()
        })
        .await
    }

    async fn by_kind(&self, kind: CorrespondenceKind) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            kind: Some(kind),
            ..Default::default()
        })
        .await
    }

    async fn received_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Correspondence>> {
        if from > to {
            return Err(AppError::bad_request("start date is after end date"));
        }
        self.search(CorrespondenceFilter {
            received_from: Some(from),
            received_to: Some(to),
            ..Default::default()
        })
        .await
    }

    async fn picked_up_by(&self, user_id: i64) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            picked_up_by_id: Some(user_id),
            ..Default::default()
        })
        .await
    }

    async fn pending(&self) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter::pending()).await
    }

    async fn pending_for_recipient(&self, recipient_id: i64) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            recipient_id: Some(recipient_id),
            ..CorrespondenceFilter::pending()
        })
        .await
    }

    async fn recorded_by(&self, user_id: i64) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            recorded_by_id: Some(user_id),
            ..Default::default()
        })
        .await
    }

    async fn by_kind_and_status(
        &self,
        kind: CorrespondenceKind,
        status: CorrespondenceStatus,
    ) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            kind: Some(kind),
            status: Some(status),
            ..Default::default()
        })
        .await
    }

    async fn stale_pending(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Correspondence>> {
        self.search(CorrespondenceFilter {
            received_before: Some(cutoff),
            ..CorrespondenceFilter::pending()
        })
        .await
    }

    async fn mark_delivered(&self, id: i64, picked_up_by_id: i64) -> AppResult<Correspondence> {
        self.ensure_user(picked_up_by_id, "Pickup user").await?;

        let item = self
            .uow
            .correspondence()
            .mark_delivered(id, picked_up_by_id, Utc::now())
            .await?;
        tracing::info!(correspondence_id = id, picked_up_by_id, "Correspondence delivered");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentType, User};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockApartmentRepository, MockCorrespondenceRepository, MockUserRepository};

    fn input() -> CorrespondenceInput {
        CorrespondenceInput {
            recorded_by_id: 1,
            recipient_id: 2,
            picked_up_by_id: None,
            apartment_id: Some(10),
            kind: CorrespondenceKind::Package,
            received_at: None,
            delivered_at: None,
            status: CorrespondenceStatus::Pending,
            notes: None,
        }
    }

    fn user(id: i64) -> User {
        let now = Utc::now();
        User {
            id,
            document_type: DocumentType::Cc,
            document_number: format!("5000{}", id),
            first_names: "Andrés".to_string(),
            last_names: "Salazar".to_string(),
            email: format!("u{}@arkania.co", id),
            phone: None,
            password_hash: String::new(),
            active: true,
            roles: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_apartment() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        let mut apartments = MockApartmentRepository::new();
        apartments.expect_find_by_id().returning(|_| Ok(None));
        let mut correspondence = MockCorrespondenceRepository::new();
        correspondence.expect_create().never();

        let uow = TestUnitOfWork::new()
            .with_users(users)
            .with_apartments(apartments)
            .with_correspondence(correspondence)
            .into_arc();
        let result = CorrespondenceManager::new(uow).create(input()).await;

        assert!(matches!(result, Err(AppError::NotFound(what)) if what == "Apartment"));
    }

    #[tokio::test]
    async fn test_stale_pending_filter() {
        let cutoff = Utc::now();
        let mut correspondence = MockCorrespondenceRepository::new();
        correspondence.expect_search()
            .withf(move |f| {
                f.status == Some(CorrespondenceStatus::Pending)
                    && f.received_before == Some(cutoff)
                    && f.oldest_first
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let uow = TestUnitOfWork::new().with_correspondence(correspondence).into_arc();
        let stale = CorrespondenceManager::new(uow).stale_pending(cutoff).await.unwrap();

        assert!(stale.is_empty());
    }

    #[tokio::test]
    async fn test_deliver_requires_pickup_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut correspondence = MockCorrespondenceRepository::new();
        correspondence.expect_mark_delivered().never();

        let uow = TestUnitOfWork::new()
            .with_users(users)
            .with_correspondence(correspondence)
            .into_arc();
        let result = CorrespondenceManager::new(uow).mark_delivered(4, 77).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
