//! Migration: Create apartamentos table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_usuarios_table::Usuarios;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Apartamentos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Apartamentos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Apartamentos::Number).string_len(10).not_null())
                    .col(ColumnDef::new(Apartamentos::Tower).string_len(20).not_null())
                    .col(ColumnDef::new(Apartamentos::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Apartamentos::Status)
                            .string_len(10)
                            .not_null()
                            .default("LIBRE"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_apartamentos_propietario")
                            .from(Apartamentos::Table, Apartamentos::OwnerId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Apartamentos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Apartamentos {
    Table,
    Id,
    Number,
    Tower,
    OwnerId,
    Status,
}
