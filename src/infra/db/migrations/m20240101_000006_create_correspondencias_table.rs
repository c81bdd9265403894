//! Migration: Create correspondencias table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_usuarios_table::Usuarios;
use super::m20240101_000004_create_apartamentos_table::Apartamentos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Correspondencias::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Correspondencias::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Correspondencias::RecordedById)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Correspondencias::RecipientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Correspondencias::PickedUpById).big_integer().null())
                    .col(ColumnDef::new(Correspondencias::ApartmentId).big_integer().null())
                    .col(ColumnDef::new(Correspondencias::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Correspondencias::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Correspondencias::DeliveredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Correspondencias::Status)
                            .string_len(10)
                            .not_null()
                            .default("PENDIENTE"),
                    )
                    .col(ColumnDef::new(Correspondencias::Notes).text().null())
                    .col(
                        ColumnDef::new(Correspondencias::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Correspondencias::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_correspondencias_registrado_por")
                            .from(Correspondencias::Table, Correspondencias::RecordedById)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_correspondencias_destinatario")
                            .from(Correspondencias::Table, Correspondencias::RecipientId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_correspondencias_retirado_por")
                            .from(Correspondencias::Table, Correspondencias::PickedUpById)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_correspondencias_apartamento")
                            .from(Correspondencias::Table, Correspondencias::ApartmentId)
                            .to(Apartamentos::Table, Apartamentos::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Correspondencias::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Correspondencias {
    Table,
    Id,
    RecordedById,
    RecipientId,
    PickedUpById,
    ApartmentId,
    Kind,
    ReceivedAt,
    DeliveredAt,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
