//! Migration: Add indexes for the most frequent listing filters.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_usuarios_table::Usuarios;
use super::m20240101_000006_create_correspondencias_table::Correspondencias;
use super::m20240101_000007_create_solicitudes_table::Solicitudes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_usuarios_active")
                    .table(Usuarios::Table)
                    .col(Usuarios::Active)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_correspondencias_recipient_status")
                    .table(Correspondencias::Table)
                    .col(Correspondencias::RecipientId)
                    .col(Correspondencias::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_solicitudes_status")
                    .table(Solicitudes::Table)
                    .col(Solicitudes::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_solicitudes_status")
                    .table(Solicitudes::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_correspondencias_recipient_status")
                    .table(Correspondencias::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_usuarios_active")
                    .table(Usuarios::Table)
                    .to_owned(),
            )
            .await
    }
}
