//! `solicitudes` table.

use sea_orm::entity::prelude::*;

use crate::domain::{RequestKind, RequestStatus, ServiceRequest};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "solicitudes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub resolved_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ServiceRequest {
    fn from(model: Model) -> Self {
        ServiceRequest {
            id: model.id,
            user_id: model.user_id,
            kind: RequestKind::from_stored(&model.kind),
            description: model.description,
            status: RequestStatus::from_stored(&model.status),
            created_at: model.created_at,
            resolved_at: model.resolved_at,
        }
    }
}
