//! Service tests over mocked repositories.
//!
//! Run with `cargo test --features test-utils`.

#![cfg(feature = "test-utils")]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockall::predicate::eq;
use tokio_test::{assert_err, assert_ok};

use arkania_api::domain::{
    OccupancyStatus, ParkingInput, RequestKind, RequestStatus, ServiceRequest, SpotType,
    UpdateServiceRequest,
};
use arkania_api::errors::{AppError, AppResult};
use arkania_api::infra::{
    ApartmentRepository, AssignmentRepository, CommonAreaRepository, CorrespondenceRepository,
    MockApartmentRepository, MockAssignmentRepository, MockCommonAreaRepository,
    MockCorrespondenceRepository, MockParkingRepository, MockRequestRepository,
    MockRoleRepository, MockUserRepository, ParkingRepository, RequestRepository, RoleRepository,
    TransactionContext, TxFuture, UnitOfWork, UserRepository,
};
use arkania_api::services::{ParkingManager, ParkingService, RequestManager, RequestService};

/// Unit of work over repository mocks; only the configured ones have expectations.
#[derive(Default)]
struct MockedUnitOfWork {
    parking: MockParkingRepository,
    requests: MockRequestRepository,
}

struct Wired {
    parking: Arc<MockParkingRepository>,
    requests: Arc<MockRequestRepository>,
}

impl MockedUnitOfWork {
    fn wire(self) -> Arc<Wired> {
        Arc::new(Wired {
            parking: Arc::new(self.parking),
            requests: Arc::new(self.requests),
        })
    }
}

#[async_trait]
impl UnitOfWork for Wired {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MockUserRepository::new())
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        Arc::new(MockRoleRepository::new())
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        Arc::new(MockAssignmentRepository::new())
    }

    fn apartments(&self) -> Arc<dyn ApartmentRepository> {
        Arc::new(MockApartmentRepository::new())
    }

    fn parking_spots(&self) -> Arc<dyn ParkingRepository> {
        self.parking.clone()
    }

    fn common_areas(&self) -> Arc<dyn CommonAreaRepository> {
        Arc::new(MockCommonAreaRepository::new())
    }

    fn correspondence(&self) -> Arc<dyn CorrespondenceRepository> {
        Arc::new(MockCorrespondenceRepository::new())
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.requests.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn request(status: RequestStatus, resolved_days_ago: Option<i64>) -> ServiceRequest {
    ServiceRequest {
        id: 4,
        user_id: 7,
        kind: RequestKind::Maintenance,
        description: "La luz del pasillo del piso 5 no enciende".to_string(),
        status,
        created_at: Utc::now() - Duration::days(10),
        resolved_at: resolved_days_ago.map(|d| Utc::now() - Duration::days(d)),
    }
}

fn edit(status: RequestStatus) -> UpdateServiceRequest {
    UpdateServiceRequest {
        status,
        description: "La luz del pasillo del piso 5 no enciende".to_string(),
    }
}

#[tokio::test]
async fn test_resolving_a_request_stamps_resolution_date() {
    let mut uow = MockedUnitOfWork::default();
    uow.requests
        .expect_find_by_id()
        .with(eq(4))
        .returning(|_| Ok(Some(request(RequestStatus::InProgress, None))));
    uow.requests
        .expect_update()
        .withf(|id, status, _, resolved_at| {
            *id == 4 && *status == RequestStatus::Resolved && resolved_at.is_some()
        })
        .returning(|_, status, _, resolved_at| {
            let mut updated = request(status, None);
            updated.resolved_at = resolved_at;
            Ok(updated)
        });

    let service = RequestManager::new(uow.wire());
    let updated = assert_ok!(service.update(4, edit(RequestStatus::Resolved)).await);

    assert_eq!(updated.status, RequestStatus::Resolved);
    assert!(updated.resolved_at.is_some());
}

#[tokio::test]
async fn test_reopening_a_request_clears_resolution_date() {
    let mut uow = MockedUnitOfWork::default();
    uow.requests
        .expect_find_by_id()
        .returning(|_| Ok(Some(request(RequestStatus::Rejected, Some(2)))));
    uow.requests
        .expect_update()
        .withf(|_, status, _, resolved_at| {
            *status == RequestStatus::Pending && resolved_at.is_none()
        })
        .returning(|_, status, _, _| Ok(request(status, None)));

    let service = RequestManager::new(uow.wire());
    let updated = service.update(4, edit(RequestStatus::Pending)).await.unwrap();

    assert!(updated.resolved_at.is_none());
}

#[tokio::test]
async fn test_editing_a_missing_request_is_not_found() {
    let mut uow = MockedUnitOfWork::default();
    uow.requests.expect_find_by_id().returning(|_| Ok(None));

    let service = RequestManager::new(uow.wire());
    let err = assert_err!(service.update(99, edit(RequestStatus::Resolved)).await);

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_inverted_date_range_is_rejected() {
    let service = RequestManager::new(MockedUnitOfWork::default().wire());
    let now = Utc::now();

    let result = service.created_between(now, now - Duration::days(1)).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_duplicate_parking_number_is_conflict() {
    let mut uow = MockedUnitOfWork::default();
    uow.parking
        .expect_number_taken()
        .with(eq("S1-023"), eq(None::<i64>))
        .returning(|_, _| Ok(true));

    let service = ParkingManager::new(uow.wire());
    let result = service
        .create(ParkingInput {
            spot_type: SpotType::Visitor,
            number: "S1-023".to_string(),
            user_id: None,
            status: OccupancyStatus::Free,
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}
