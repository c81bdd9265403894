//! Correspondence repository implementation.
//!
//! Returned items carry the full names of the users they reference.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::{correspondence, user};
use crate::domain::user::full_name;
use crate::domain::{Correspondence, CorrespondenceFilter, CorrespondenceInput, CorrespondenceStatus};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Correspondence repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CorrespondenceRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Correspondence>>;

    /// Items matching every set criterion
    async fn search(&self, filter: CorrespondenceFilter) -> AppResult<Vec<Correspondence>>;

    async fn create(&self, input: CorrespondenceInput) -> AppResult<Correspondence>;

    async fn update(&self, id: i64, input: CorrespondenceInput) -> AppResult<Correspondence>;

    /// Mark as picked up by the given user
    async fn mark_delivered(
        &self,
        id: i64,
        picked_up_by_id: i64,
        at: DateTime<Utc>,
    ) -> AppResult<Correspondence>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of CorrespondenceRepository
pub struct CorrespondenceStore {
    db: DatabaseConnection,
}

impl CorrespondenceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_names(&self, models: Vec<correspondence::Model>) -> AppResult<Vec<Correspondence>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models
            .iter()
            .flat_map(|m| [Some(m.recorded_by_id), Some(m.recipient_id), m.picked_up_by_id])
            .flatten()
            .collect();

        let names: HashMap<i64, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, full_name(&u.first_names, &u.last_names)))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let mut item = Correspondence::from(m);
                item.recorded_by_name = names.get(&item.recorded_by_id).cloned();
                item.recipient_name = names.get(&item.recipient_id).cloned();
                item.picked_up_by_name = item.picked_up_by_id.and_then(|id| names.get(&id).cloned());
                item
            })
            .collect())
    }

    async fn with_names_one(&self, model: correspondence::Model) -> AppResult<Correspondence> {
        self.with_names(vec![model])
            .await?
            .pop()
            .ok_or_not_found("Correspondence")
    }
}

#[async_trait]
impl CorrespondenceRepository for CorrespondenceStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Correspondence>> {
        match correspondence::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.with_names_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn search(&self, filter: CorrespondenceFilter) -> AppResult<Vec<Correspondence>> {
        use correspondence::Column;

        let mut query = correspondence::Entity::find();

        if let Some(id) = filter.recipient_id {
            query = query.filter(Column::RecipientId.eq(id));
        }
        if let Some(id) = filter.recorded_by_id {
            query = query.filter(Column::RecordedById.eq(id));
        }
        if let Some(id) = filter.picked_up_by_id {
            query = query.filter(Column::PickedUpById.eq(id));
        }
        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.received_from {
            query = query.filter(Column::ReceivedAt.gte(from));
        }
        if let Some(to) = filter.received_to {
            query = query.filter(Column::ReceivedAt.lte(to));
        }
        if let Some(cutoff) = filter.received_before {
            query = query.filter(Column::ReceivedAt.lt(cutoff));
        }

        let query = if filter.oldest_first {
            query.order_by_asc(Column::ReceivedAt)
        } else {
            query.order_by_asc(Column::Id)
        };

        let models = query.all(&self.db).await?;
        self.with_names(models).await
    }

    async fn create(&self, input: CorrespondenceInput) -> AppResult<Correspondence> {
        let now = Utc::now();
        let model = correspondence::ActiveModel {
            recorded_by_id: Set(input.recorded_by_id),
            recipient_id: Set(input.recipient_id),
            picked_up_by_id: Set(input.picked_up_by_id),
            apartment_id: Set(input.apartment_id),
            kind: Set(input.kind.into()),
            received_at: Set(input.received_at.unwrap_or(now)),
            delivered_at: Set(input.delivered_at),
            status: Set(input.status.into()),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        self.with_names_one(model).await
    }

    async fn update(&self, id: i64, input: CorrespondenceInput) -> AppResult<Correspondence> {
        let existing = correspondence::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Correspondence")?;

        let received_at = input.received_at.unwrap_or(existing.received_at);
        let mut active: correspondence::ActiveModel = existing.into();
        active.recorded_by_id = Set(input.recorded_by_id);
        active.recipient_id = Set(input.recipient_id);
        active.picked_up_by_id = Set(input.picked_up_by_id);
        active.apartment_id = Set(input.apartment_id);
        active.kind = Set(input.kind.into());
        active.received_at = Set(received_at);
        active.delivered_at = Set(input.delivered_at);
        active.status = Set(input.status.into());
        active.notes = Set(input.notes);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_names_one(model).await
    }

    async fn mark_delivered(
        &self,
        id: i64,
        picked_up_by_id: i64,
        at: DateTime<Utc>,
    ) -> AppResult<Correspondence> {
        let existing = correspondence::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Correspondence")?;

        let mut active: correspondence::ActiveModel = existing.into();
        active.status = Set(CorrespondenceStatus::Delivered.into());
        active.delivered_at = Set(Some(at));
        active.picked_up_by_id = Set(Some(picked_up_by_id));
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_names_one(model).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = correspondence::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Correspondence"));
        }

        Ok(())
    }
}
