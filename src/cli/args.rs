//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Arkania - residential complex administration backend
#[derive(Parser, Debug)]
#[command(name = "arkania")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Load reference data
    Seed(SeedArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub target: SeedTarget,
}

/// Data that can be seeded
#[derive(Subcommand, Debug)]
pub enum SeedTarget {
    /// Create the default roles that are missing
    Roles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["arkania", "serve", "--port", "8081"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, 8081),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_seed_roles_verbose() {
        let cli = Cli::try_parse_from(["arkania", "-v", "seed", "roles"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Seed(SeedArgs {
                target: SeedTarget::Roles
            })
        ));
    }

    #[test]
    fn test_unknown_migrate_action_is_rejected() {
        assert!(Cli::try_parse_from(["arkania", "migrate", "sideways"]).is_err());
    }
}
