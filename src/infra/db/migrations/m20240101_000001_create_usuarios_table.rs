//! Migration: Create usuarios table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Usuarios::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Usuarios::DocumentType).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Usuarios::DocumentNumber)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Usuarios::FirstNames).string_len(50).not_null())
                    .col(ColumnDef::new(Usuarios::LastNames).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Usuarios::Email)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Usuarios::Phone).string_len(15).null())
                    .col(ColumnDef::new(Usuarios::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Usuarios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Usuarios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Usuarios {
    Table,
    Id,
    DocumentType,
    DocumentNumber,
    FirstNames,
    LastNames,
    Email,
    Phone,
    PasswordHash,
    Active,
    CreatedAt,
    UpdatedAt,
}
