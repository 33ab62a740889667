use anyhow::{Context, Result};
use branch_desk_postgres::{cleanup_database, init_database};
use branch_desk_service::telemetry::init_tracing;
use branch_desk_service::{BranchDesk, BranchDeskConfig};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Operator tooling for the branch desk database
#[derive(Parser, Debug)]
#[command(name = "branch-desk-admin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the schema migrations in order
    Migrate,
    /// Drop every table and type, newest migration first
    Cleanup,
    /// Create the admin account
    SeedAdmin {
        #[arg(long)]
        password: String,
    },
    /// Register a branch
    AddBranch {
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BranchDeskConfig::from_env().context("Failed to read configuration")?;
    init_tracing(&config.log_level, config.json_logs)?;

    match cli.command {
        Command::Migrate => {
            let pool = pool(&config).await?;
            let applied = init_database(&pool).await.context("Migration failed")?;
            tracing::info!(files = applied.len(), "Schema migrated");
        }
        Command::Cleanup => {
            let pool = pool(&config).await?;
            let applied = cleanup_database(&pool).await.context("Cleanup failed")?;
            tracing::info!(files = applied.len(), "Schema removed");
        }
        Command::SeedAdmin { password } => {
            let desk = connect(&config).await?;
            let admin = desk.auth.seed_admin(&password).await?;
            println!("Admin {} created", admin.id);
        }
        Command::AddBranch { name } => {
            let desk = connect(&config).await?;
            let branch = desk.branches.create_branch(&name).await?;
            println!("Branch {} '{}' created", branch.id, branch.name);
        }
    }
    Ok(())
}

async fn pool(config: &BranchDeskConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")
}

async fn connect(config: &BranchDeskConfig) -> Result<BranchDesk> {
    BranchDesk::connect(config)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to start services")
}
