//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_usuarios_table;
mod m20240101_000002_create_roles_table;
mod m20240101_000003_create_usuario_rol_table;
mod m20240101_000004_create_apartamentos_table;
mod m20240101_000005_create_areas_comunes_table;
mod m20240101_000006_create_correspondencias_table;
mod m20240101_000007_create_solicitudes_table;
mod m20240101_000008_create_parqueaderos_table;
mod m20240102_000001_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_usuarios_table::Migration),
            Box::new(m20240101_000002_create_roles_table::Migration),
            Box::new(m20240101_000003_create_usuario_rol_table::Migration),
            Box::new(m20240101_000004_create_apartamentos_table::Migration),
            Box::new(m20240101_000005_create_areas_comunes_table::Migration),
            Box::new(m20240101_000006_create_correspondencias_table::Migration),
            Box::new(m20240101_000007_create_solicitudes_table::Migration),
            Box::new(m20240101_000008_create_parqueaderos_table::Migration),
            Box::new(m20240102_000001_add_lookup_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_one_table_per_create_migration() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert!(names.contains(&"m20240101_000004_create_apartamentos_table".to_string()));
        assert!(names.contains(&"m20240101_000008_create_parqueaderos_table".to_string()));
        assert!(names
            .iter()
            .filter(|n| n.contains("_create_"))
            .all(|n| n.ends_with("_table")));
    }
}
