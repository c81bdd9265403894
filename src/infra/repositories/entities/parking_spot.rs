//! `parqueaderos` table.

use sea_orm::entity::prelude::*;

use crate::domain::{OccupancyStatus, ParkingSpot, SpotType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "parqueaderos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub spot_type: String,
    #[sea_orm(unique)]
    pub number: String,
    pub user_id: Option<i64>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ParkingSpot {
    fn from(model: Model) -> Self {
        ParkingSpot {
            id: model.id,
            spot_type: SpotType::from_stored(&model.spot_type),
            number: model.number,
            user_id: model.user_id,
            status: OccupancyStatus::from_stored(&model.status),
        }
    }
}
