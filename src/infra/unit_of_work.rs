//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository and runs multi-step role
//! assignment changes inside one database transaction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::assignment_queries as queries;
use super::repositories::{
    ApartmentRepository, ApartmentStore, AssignmentRepository, AssignmentStore,
    CommonAreaRepository, CommonAreaStore, CorrespondenceRepository, CorrespondenceStore,
    ParkingRepository, ParkingStore, RequestRepository, RequestStore, RoleRepository, RoleStore,
    UserRepository, UserStore,
};
use crate::domain::RoleAssignment;
use crate::errors::{AppError, AppResult};

/// Boxed future handed to transactional closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods;
/// tests use a hand-written implementation over repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    fn assignments(&self) -> Arc<dyn AssignmentRepository>;

    fn apartments(&self) -> Arc<dyn ApartmentRepository>;

    fn parking_spots(&self) -> Arc<dyn ParkingRepository>;

    fn common_areas(&self) -> Arc<dyn CommonAreaRepository>;

    fn correspondence(&self) -> Arc<dyn CorrespondenceRepository>;

    fn requests(&self) -> Arc<dyn RequestRepository>;

    /// Run the closure in a `ReadCommitted` transaction.
    ///
    /// Commits on success, rolls back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Same as [`UnitOfWork::transaction`] with serializable isolation.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn assignments(&self) -> TxAssignmentRepository<'_> {
        TxAssignmentRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    roles: Arc<RoleStore>,
    assignments: Arc<AssignmentStore>,
    apartments: Arc<ApartmentStore>,
    parking_spots: Arc<ParkingStore>,
    common_areas: Arc<CommonAreaStore>,
    correspondence: Arc<CorrespondenceStore>,
    requests: Arc<RequestStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db.clone())),
            assignments: Arc::new(AssignmentStore::new(db.clone())),
            apartments: Arc::new(ApartmentStore::new(db.clone())),
            parking_spots: Arc::new(ParkingStore::new(db.clone())),
            common_areas: Arc::new(CommonAreaStore::new(db.clone())),
            correspondence: Arc::new(CorrespondenceStore::new(db.clone())),
            requests: Arc::new(RequestStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignments.clone()
    }

    fn apartments(&self) -> Arc<dyn ApartmentRepository> {
        self.apartments.clone()
    }

    fn parking_spots(&self) -> Arc<dyn ParkingRepository> {
        self.parking_spots.clone()
    }

    fn common_areas(&self) -> Arc<dyn CommonAreaRepository> {
        self.common_areas.clone()
    }

    fn correspondence(&self) -> Arc<dyn CorrespondenceRepository> {
        self.correspondence.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.requests.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

/// Transaction-aware role assignment repository.
///
/// Shares its queries with [`AssignmentStore`] so both paths keep the
/// single-active-row rule.
pub struct TxAssignmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAssignmentRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_active_by_pair(
        &self,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<Option<RoleAssignment>> {
        let model = queries::find_active_pair(self.txn, user_id, role_id).await?;
        queries::labelled_one(self.txn, model).await
    }

    /// Activate the pair, reusing an inactive row when one exists
    pub async fn assign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        let model = queries::assign(self.txn, user_id, role_id).await?;
        queries::labelled_required(self.txn, model).await
    }

    /// Deactivate the active row of the pair
    pub async fn unassign(&self, user_id: i64, role_id: i64) -> AppResult<RoleAssignment> {
        let model = queries::deactivate_pair(self.txn, user_id, role_id).await?;
        queries::labelled_required(self.txn, model).await
    }
}

/// Simpler API for executing transactional operations.
///
/// ```ignore
/// let created = with_transaction!(self.uow, |ctx| {
///     ctx.assignments().assign(user_id, role_id).await
/// })?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
