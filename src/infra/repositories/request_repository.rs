//! Service request repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::contains_ignore_case;
use super::entities::service_request;
use crate::domain::{RequestFilter, RequestKind, RequestStatus, ServiceRequest};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service request repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceRequest>>;

    /// Requests matching every set criterion
    async fn search(&self, filter: RequestFilter) -> AppResult<Vec<ServiceRequest>>;

    async fn create(
        &self,
        user_id: i64,
        kind: RequestKind,
        description: String,
    ) -> AppResult<ServiceRequest>;

    async fn update(
        &self,
        id: i64,
        status: RequestStatus,
        description: String,
        resolved_at: Option<DateTime<Utc>>,
    ) -> AppResult<ServiceRequest>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of RequestRepository
pub struct RequestStore {
    db: DatabaseConnection,
}

impl RequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequestRepository for RequestStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceRequest>> {
        let model = service_request::Entity::find_by_id(id)
            .one(&self.db)
            .await?;
        Ok(model.map(ServiceRequest::from))
    }

    async fn search(&self, filter: RequestFilter) -> AppResult<Vec<ServiceRequest>> {
        use service_request::Column;

        let mut query = service_request::Entity::find();

        if let Some(from) = filter.created_from {
            query = query.filter(Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_to {
            query = query.filter(Column::CreatedAt.lte(to));
        }
        if let Some(from) = filter.resolved_from {
            query = query.filter(Column::ResolvedAt.gte(from));
        }
        if let Some(to) = filter.resolved_to {
            query = query.filter(Column::ResolvedAt.lte(to));
        }
        if !filter.statuses.is_empty() {
            query = query.filter(Column::Status.is_in(filter.statuses.iter().map(|s| s.as_str())));
        }
        if !filter.kinds.is_empty() {
            query = query.filter(Column::Kind.is_in(filter.kinds.iter().map(|k| k.as_str())));
        }
        if let Some(text) = filter.description.as_deref() {
            query = query.filter(contains_ignore_case(Column::Description, text));
        }

        let query = if filter.order_by_resolution {
            query.order_by_asc(Column::ResolvedAt)
        } else {
            query.order_by_asc(Column::CreatedAt)
        };

        let models = query.order_by_asc(Column::Id).all(&self.db).await?;
        Ok(models.into_iter().map(ServiceRequest::from).collect())
    }

    async fn create(
        &self,
        user_id: i64,
        kind: RequestKind,
        description: String,
    ) -> AppResult<ServiceRequest> {
        let model = service_request::ActiveModel {
            user_id: Set(user_id),
            kind: Set(kind.into()),
            description: Set(description),
            status: Set(RequestStatus::Pending.into()),
            created_at: Set(Utc::now()),
            resolved_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(ServiceRequest::from(model))
    }

    async fn update(
        &self,
        id: i64,
        status: RequestStatus,
        description: String,
        resolved_at: Option<DateTime<Utc>>,
    ) -> AppResult<ServiceRequest> {
        let existing = service_request::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Request")?;

        let mut active: service_request::ActiveModel = existing.into();
        active.status = Set(status.into());
        active.description = Set(description);
        active.resolved_at = Set(resolved_at);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(ServiceRequest::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = service_request::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Request"));
        }

        Ok(())
    }
}
