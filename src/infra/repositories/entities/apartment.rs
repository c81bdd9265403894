//! `apartamentos` table.

use sea_orm::entity::prelude::*;

use crate::domain::{Apartment, OccupancyStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "apartamentos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub number: String,
    pub tower: String,
    pub owner_id: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Apartment {
    fn from(model: Model) -> Self {
        Apartment {
            id: model.id,
            number: model.number,
            tower: model.tower,
            owner_id: model.owner_id,
            status: OccupancyStatus::from_stored(&model.status),
        }
    }
}
