//! `areas_comunes` table.

use sea_orm::entity::prelude::*;

use crate::domain::{AreaStatus, CommonArea};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "areas_comunes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub max_capacity: i32,
    pub opening_hours: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CommonArea {
    fn from(model: Model) -> Self {
        CommonArea {
            id: model.id,
            name: model.name,
            description: model.description,
            location: model.location,
            max_capacity: model.max_capacity,
            opening_hours: model.opening_hours,
            status: AreaStatus::from_stored(&model.status),
        }
    }
}
