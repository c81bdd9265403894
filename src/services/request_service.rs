//! Service request service - Resident maintenance tickets, complaints,
//! bookings and inquiries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CreateServiceRequest, RequestFilter, RequestKind, RequestStatus, ServiceRequest,
    UpdateServiceRequest,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Request service trait for dependency injection.
#[async_trait]
pub trait RequestService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<ServiceRequest>>;

    async fn get(&self, id: i64) -> AppResult<ServiceRequest>;

    /// New requests start pending
    async fn create(&self, input: CreateServiceRequest) -> AppResult<ServiceRequest>;

    /// Change status and description; closing sets `resolved_at`
    async fn update(&self, id: i64, input: UpdateServiceRequest) -> AppResult<ServiceRequest>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ServiceRequest>>;

    async fn resolved_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ServiceRequest>>;

    async fn by_statuses(&self, statuses: Vec<RequestStatus>) -> AppResult<Vec<ServiceRequest>>;

    async fn by_kinds(&self, kinds: Vec<RequestKind>) -> AppResult<Vec<ServiceRequest>>;

    async fn search_description(&self, text: &str) -> AppResult<Vec<ServiceRequest>>;

    async fn by_statuses_and_kinds(
        &self,
        statuses: Vec<RequestStatus>,
        kinds: Vec<RequestKind>,
    ) -> AppResult<Vec<ServiceRequest>>;
}

/// Concrete implementation of RequestService using Unit of Work.
pub struct RequestManager<U: UnitOfWork> {
    uow: Arc<U>,
}

/// Resolution date after moving from `current` to `next`
fn resolution_date(
    current: &ServiceRequest,
    next: RequestStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if !next.is_closed() {
        return None;
    }
    match current.resolved_at {
        Some(at) if current.status.is_closed() => Some(at),
        _ => Some(now),
    }
}

fn check_range(from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<()> {
    if from > to {
        return Err(AppError::bad_request("start date is after end date"));
    }
    Ok(())
}

/// An empty criterion list would otherwise match every request
fn require_any<T>(values: &[T], what: &str) -> AppResult<()> {
    if values.is_empty() {
        return Err(AppError::bad_request(format!("at least one {} is required", what)));
    }
    Ok(())
}

impl<U: UnitOfWork> RequestManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn search(&self, filter: RequestFilter) -> AppResult<Vec<ServiceRequest>> {
        self.uow.requests().search(filter).await
    }
}

#[async_trait]
impl<U: UnitOfWork> RequestService for RequestManager<U> {
    async fn list(&self) -> AppResult<Vec<ServiceRequest>> {
        self.search(RequestFilter::default()).await
    }

    async fn get(&self, id: i64) -> AppResult<ServiceRequest> {
        self.uow
            .requests()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Request")
    }

    async fn create(&self, input: CreateServiceRequest) -> AppResult<ServiceRequest> {
        self.uow
            .users()
            .find_by_id(input.user_id)
            .await?
            .ok_or_not_found("User")?;

        let request = self
            .uow
            .requests()
            .create(input.user_id, input.kind, input.description)
            .await?;
        tracing::info!(
            request_id = request.id,
            user_id = request.user_id,
            kind = %request.kind,
            "Service request created"
        );
        Ok(request)
    }

    async fn update(&self, id: i64, input: UpdateServiceRequest) -> AppResult<ServiceRequest> {
        let current = self.get(id).await?;
        let resolved_at = resolution_date(&current, input.status, Utc::now());

        let request = self
            .uow
            .requests()
            .update(id, input.status, input.description, resolved_at)
            .await?;
        tracing::debug!(request_id = id, status = %request.status, "Service request updated");
        Ok(request)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.uow.requests().delete(id).await?;
        tracing::info!(request_id = id, "Service request deleted");
        Ok(())
    }

    async fn created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ServiceRequest>> {
        check_range(from, to)?;
        self.search(RequestFilter {
            created_from: Some(from),
            created_to: Some(to),
            ..Default::default()
        })
        .await
    }

    async fn resolved_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ServiceRequest>> {
        check_range(from, to)?;
        self.search(RequestFilter {
            resolved_from: Some(from),
            resolved_to: Some(to),
            order_by_resolution: true,
            ..Default::default()
        })
        .await
    }

    async fn by_statuses(&self, statuses: Vec<RequestStatus>) -> AppResult<Vec<ServiceRequest>> {
        require_any(&statuses, "status")?;
        self.search(RequestFilter {
            statuses,
            ..Default::default()
        })
        .await
    }

    async fn by_kinds(&self, kinds: Vec<RequestKind>) -> AppResult<Vec<ServiceRequest>> {
        require_any(&kinds, "type")?;
        self.search(RequestFilter {
            kinds,
            ..Default::default()
        })
        .await
    }

    async fn search_description(&self, text: &str) -> AppResult<Vec<ServiceRequest>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::bad_request("search text must not be empty"));
        }
        self.search(RequestFilter {
            description: Some(text.to_string()),
            ..Default::default()
        })
        .await
    }

    async fn by_statuses_and_kinds(
        &self,
        statuses: Vec<RequestStatus>,
        kinds: Vec<RequestKind>,
    ) -> AppResult<Vec<ServiceRequest>> {
        require_any(&statuses, "status")?;
        require_any(&kinds, "type")?;
        self.search(RequestFilter {
            statuses,
            kinds,
            ..Default::default()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockRequestRepository, MockUserRepository};

    fn request(status: RequestStatus, resolved_at: Option<DateTime<Utc>>) -> ServiceRequest {
        ServiceRequest {
            id: 1,
            user_id: 3,
            kind: RequestKind::Maintenance,
            description: "Fuga de agua en el baño social".to_string(),
            status,
            created_at: Utc::now() - Duration::days(2),
            resolved_at,
        }
    }

    #[test]
    fn test_closing_sets_resolution_date() {
        let now = Utc::now();
        let open = request(RequestStatus::InProgress, None);

        assert_eq!(resolution_date(&open, RequestStatus::Resolved, now), Some(now));
        assert_eq!(resolution_date(&open, RequestStatus::Pending, now), None);
    }

    #[test]
    fn test_reopening_clears_and_reclosing_keeps_date() {
        let earlier = Utc::now() - Duration::hours(5);
        let closed = request(RequestStatus::Resolved, Some(earlier));

        assert_eq!(resolution_date(&closed, RequestStatus::InProgress, Utc::now()), None);
        assert_eq!(
            resolution_date(&closed, RequestStatus::Rejected, Utc::now()),
            Some(earlier)
        );
    }

    #[tokio::test]
    async fn test_create_requires_existing_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut requests = MockRequestRepository::new();
        requests.expect_create().never();

        let uow = TestUnitOfWork::new()
            .with_users(users)
            .with_requests(requests)
            .into_arc();
        let input = CreateServiceRequest {
            user_id: 404,
            kind: RequestKind::Complaint,
            description: "Ruido excesivo en la noche".to_string(),
        };
        let result = RequestManager::new(uow).create(input).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_to_resolved_passes_resolution_date() {
        let mut requests = MockRequestRepository::new();
        requests.expect_find_by_id()
            .returning(|_| Ok(Some(request(RequestStatus::Pending, None))));
        requests.expect_update()
            .withf(|_, status, _, resolved_at| {
                *status == RequestStatus::Resolved && resolved_at.is_some()
            })
            .times(1)
            .returning(|_, status, _, resolved_at| Ok(request(status, resolved_at)));

        let uow = TestUnitOfWork::new().with_requests(requests).into_arc();
        let input = UpdateServiceRequest {
            status: RequestStatus::Resolved,
            description: "Fuga de agua reparada por el conserje".to_string(),
        };
        let updated = RequestManager::new(uow).update(1, input).await.unwrap();

        assert!(updated.resolved_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_criteria_lists_are_rejected() {
        let mut requests = MockRequestRepository::new();
        requests.expect_search().never();

        let service = RequestManager::new(TestUnitOfWork::new().with_requests(requests).into_arc());

        assert!(matches!(
            service.by_statuses(vec![]).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(service.by_kinds(vec![]).await, Err(AppError::BadRequest(_))));
        assert!(matches!(
            service
                .by_statuses_and_kinds(vec![RequestStatus::Pending], vec![])
                .await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service
                .by_statuses_and_kinds(vec![], vec![RequestKind::Complaint])
                .await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_by_statuses_filters_on_given_statuses() {
        let mut requests = MockRequestRepository::new();
        requests.expect_search()
            .withf(|filter| {
                filter.statuses == vec![RequestStatus::Pending, RequestStatus::InProgress]
                    && filter.kinds.is_empty()
            })
            .times(1)
            .returning(|_| Ok(vec![request(RequestStatus::Pending, None)]));

        let service = RequestManager::new(TestUnitOfWork::new().with_requests(requests).into_arc());
        let found = service
            .by_statuses(vec![RequestStatus::Pending, RequestStatus::InProgress])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
    }
}
