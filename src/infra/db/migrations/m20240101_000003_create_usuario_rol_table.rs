//! Migration: Create usuario_rol association table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_usuarios_table::Usuarios;
use super::m20240101_000002_create_roles_table::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsuarioRol::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UsuarioRol::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UsuarioRol::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UsuarioRol::RoleId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UsuarioRol::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UsuarioRol::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UsuarioRol::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_rol_usuario")
                            .from(UsuarioRol::Table, UsuarioRol::UserId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_rol_rol")
                            .from(UsuarioRol::Table, UsuarioRol::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One active assignment per (user, role); inactive history rows may repeat
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_usuario_rol_active_pair \
                 ON usuario_rol (user_id, role_id) WHERE active",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usuario_rol_role_id")
                    .table(UsuarioRol::Table)
                    .col(UsuarioRol::RoleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsuarioRol::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UsuarioRol {
    Table,
    Id,
    UserId,
    RoleId,
    Active,
    CreatedAt,
    UpdatedAt,
}
