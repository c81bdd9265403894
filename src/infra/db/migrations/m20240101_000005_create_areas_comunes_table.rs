//! Migration: Create areas_comunes table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AreasComunes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AreasComunes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AreasComunes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(AreasComunes::Description).text().not_null())
                    .col(ColumnDef::new(AreasComunes::Location).string_len(200).not_null())
                    .col(ColumnDef::new(AreasComunes::MaxCapacity).integer().not_null())
                    .col(
                        ColumnDef::new(AreasComunes::OpeningHours)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AreasComunes::Status)
                            .string_len(10)
                            .not_null()
                            .default("activa"),
                    )
                    .check(Expr::col(AreasComunes::MaxCapacity).between(1, 1000))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AreasComunes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AreasComunes {
    Table,
    Id,
    Name,
    Description,
    Location,
    MaxCapacity,
    OpeningHours,
    Status,
}
