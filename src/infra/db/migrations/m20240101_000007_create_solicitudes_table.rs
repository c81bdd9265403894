//! Migration: Create solicitudes table.

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
                    .table(Solicitudes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Solicitudes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Solicitudes::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Solicitudes::Kind).string_len(15).not_null())
                    .col(ColumnDef::new(Solicitudes::Description).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Solicitudes::Status)
                            .string_len(15)
                            .not_null()
                            .default("pendiente"),
                    )
                    .col(
                        ColumnDef::new(Solicitudes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Solicitudes::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_solicitudes_usuario")
                            .from(Solicitudes::Table, Solicitudes::UserId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Solicitudes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Solicitudes {
    Table,
    Id,
    UserId,
    Kind,
    Description,
    Status,
    CreatedAt,
    ResolvedAt,
}
