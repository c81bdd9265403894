//! `correspondencias` table.

use sea_orm::entity::prelude::*;

use crate::domain::{Correspondence, CorrespondenceKind, CorrespondenceStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "correspondencias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recorded_by_id: i64,
    pub recipient_id: i64,
    pub picked_up_by_id: Option<i64>,
    pub apartment_id: Option<i64>,
    pub kind: String,
    pub received_at: DateTimeUtc,
    pub delivered_at: Option<DateTimeUtc>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Correspondence {
    fn from(model: Model) -> Self {
        Correspondence {
            id: model.id,
            recorded_by_id: model.recorded_by_id,
            recipient_id: model.recipient_id,
            picked_up_by_id: model.picked_up_by_id,
            apartment_id: model.apartment_id,
            kind: CorrespondenceKind::from_stored(&model.kind),
            received_at: model.received_at,
            delivered_at: model.delivered_at,
            status: CorrespondenceStatus::from_stored(&model.status),
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
            recorded_by_name: None,
            recipient_name: None,
            picked_up_by_name: None,
        }
    }
}
