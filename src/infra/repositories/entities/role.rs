//! `roles` table.

use sea_orm::entity::prelude::*;

use crate::domain::{Permissions, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    /// JSON array of permission names
    #[sea_orm(column_type = "Text", nullable)]
    pub permissions: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignment,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity with its active user count
    pub fn into_domain(self, number_of_users: u64) -> Role {
        Role {
            id: self.id,
            permissions: Permissions::from_stored(self.permissions.as_deref()).into_vec(),
            name: self.name,
            description: self.description,
            active: self.active,
            number_of_users,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
