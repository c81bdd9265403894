//! `usuarios` table.

use sea_orm::entity::prelude::*;

use crate::domain::{DocumentType, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub document_type: String,
    #[sea_orm(unique)]
    pub document_number: String,
    pub first_names: String,
    pub last_names: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub active: bool,
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
    /// Convert to the domain entity with its active role names
    pub fn into_domain(self, roles: Vec<String>) -> User {
        User {
            id: self.id,
            document_type: DocumentType::from_stored(&self.document_type),
            document_number: self.document_number,
            first_names: self.first_names,
            last_names: self.last_names,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            active: self.active,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
