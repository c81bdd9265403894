//! Migration: Create parqueaderos table.

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
                    .table(Parqueaderos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parqueaderos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Parqueaderos::SpotType).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Parqueaderos::Number)
                            .string_len(15)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Parqueaderos::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(Parqueaderos::Status)
                            .string_len(10)
                            .not_null()
                            .default("LIBRE"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parqueaderos_usuario")
                            .from(Parqueaderos::Table, Parqueaderos::UserId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parqueaderos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Parqueaderos {
    Table,
    Id,
    SpotType,
    Number,
    UserId,
    Status,
}
