//! Seed command - Loads reference data.

use crate::cli::args::{SeedArgs, SeedTarget};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    match args.target {
        SeedTarget::Roles => {
            let created = services.roles().initialize_default_roles().await?;
            for role in &created {
                println!("created {}", role.name);
            }
            tracing::info!(count = created.len(), "Role seeding finished");
        }
    }

    Ok(())
}
