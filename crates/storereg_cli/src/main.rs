// storereg_cli/src/main.rs
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

use storereg_cli::commands;
use storereg_cli::config::Config;

#[derive(Parser)]
#[command(name = "storereg")]
#[command(about = "Store-registration back office admin tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database schema from embedded assets
    Rebuild(commands::rebuild::RebuildArgs),

    /// Issue unique access codes
    Generate(commands::generate::GenerateArgs),

    /// Create a back-office administrator account
    CreateAdmin(commands::create_admin::CreateAdminArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let cli = Cli::parse();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    match cli.command {
        Commands::Rebuild(args) => {
            commands::rebuild::execute(pool, args).await?;
        }
        Commands::Generate(args) => {
            commands::generate::execute(pool, args).await?;
        }
        Commands::CreateAdmin(args) => {
            commands::create_admin::execute(pool, args).await?;
        }
    }

    Ok(())
}
